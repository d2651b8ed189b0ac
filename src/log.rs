//! Commit enumeration: machine-format `git log` output into commit records.
//!
//! The log is requested as `%H%x1f%s%x1f%cI%x1f%ae`, one commit per line with
//! ASCII unit separators between fields, which survives arbitrary subject
//! text short of an embedded control character.

use chrono::{DateTime, Utc};

/// The unit separator used in the `git log` pretty format
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// Pretty format passed to `git log`
pub const LOG_FORMAT: &str = "%H%x1f%s%x1f%cI%x1f%ae";

/// One commit from the first-parent history.
///
/// Immutable once produced; the timestamp is normalized to UTC and converted
/// to a display timezone only at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub subject: String,
    pub timestamp: DateTime<Utc>,
    pub author_email: String,
}

/// Selection options forwarded to `git log`.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// At most this many commits, most recent first
    pub limit: Option<usize>,
    /// Author pattern for `git log --author` (regex allowed)
    pub author: Option<String>,
}

/// Parse one line of machine-format log output.
///
/// Lines that do not split into exactly four fields, or whose timestamp is
/// not valid ISO 8601, are skipped by returning `None`. The log format is
/// machine-generated, so a malformed line means truncated or interleaved
/// output rather than anything recoverable.
pub fn parse_commit_line(line: &str) -> Option<CommitRecord> {
    let mut parts = line.split(FIELD_SEPARATOR);
    let (hash, subject, timestamp, author_email) =
        (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || hash.is_empty() {
        return None;
    }

    let timestamp = DateTime::parse_from_rfc3339(timestamp)
        .ok()?
        .with_timezone(&Utc);

    Some(CommitRecord {
        hash: hash.to_string(),
        subject: subject.to_string(),
        timestamp,
        author_email: author_email.to_string(),
    })
}

/// Parse full `git log` output, dropping malformed lines.
pub fn parse_log(output: &str) -> Vec<CommitRecord> {
    output.lines().filter_map(parse_commit_line).collect()
}
