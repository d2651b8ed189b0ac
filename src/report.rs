//! Markdown rendering of per-commit change records.
//!
//! The formatter owns everything about presentation: grouping records by file
//! (stable, insertion order of first appearance, so the extractor's ordering
//! guarantee survives), fenced diff blocks, backtick escaping, and timestamp
//! conversion to the display timezone. Commits with no extracted changes are
//! omitted rather than rendered empty.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::extract::{ChangeKind, ChangeRecord};
use crate::log::CommitRecord;

/// Render the full report for an ordered list of commits and their changes.
pub fn render(entries: &[(CommitRecord, Vec<ChangeRecord>)], timezone: Tz) -> String {
    let mut out = String::from("# Change Notes\n");

    for (commit, changes) in entries {
        if changes.is_empty() {
            // Merge commits and commits touching only binary content
            continue;
        }

        out.push_str("\n### ");
        out.push_str(&commit.subject);
        out.push_str("\n\n*");
        out.push_str(short_hash(&commit.hash));
        out.push_str(" — ");
        out.push_str(&format_timestamp(&commit.timestamp, timezone));
        out.push_str("*\n");

        for (file, records) in group_by_file(changes) {
            out.push_str("\n**File:** `");
            out.push_str(file);
            out.push_str("`\n\n```diff\n");
            for record in records {
                let sign = match record.kind {
                    ChangeKind::Addition => '+',
                    ChangeKind::Deletion => '-',
                };
                out.push_str(&format!(
                    "- L{}: {} {}\n",
                    record.line,
                    sign,
                    record.text.replace('`', "\\`")
                ));
            }
            out.push_str("```\n");
        }
    }

    out
}

/// Convert a UTC timestamp to the display timezone.
///
/// Rendered as `YYYY-MM-DD HH:MM:SS ±HHMM (ABBR)`, e.g.
/// `2025-09-02 08:34:56 -0400 (EDT)`.
pub fn format_timestamp(timestamp: &DateTime<Utc>, timezone: Tz) -> String {
    timestamp
        .with_timezone(&timezone)
        .format("%Y-%m-%d %H:%M:%S %z (%Z)")
        .to_string()
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// Group records by file, preserving first-appearance order and the record
/// order within each file.
fn group_by_file(changes: &[ChangeRecord]) -> Vec<(&str, Vec<&ChangeRecord>)> {
    let mut groups: Vec<(&str, Vec<&ChangeRecord>)> = Vec::new();
    for change in changes {
        match groups.iter_mut().find(|(file, _)| *file == change.file) {
            Some((_, records)) => records.push(change),
            None => groups.push((change.file.as_str(), vec![change])),
        }
    }
    groups
}
