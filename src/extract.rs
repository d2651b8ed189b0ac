//! Streaming change extraction from zero-context unified diffs.
//!
//! Turns raw `git show --unified=0` text into a lazy sequence of
//! [`ChangeRecord`]s, one per added or removed line, numbered exactly as an
//! editor would show them: additions against the new file, deletions against
//! the old file.
//!
//! The extractor is best-effort by contract. Diff text is untrusted external
//! input, so malformed content never produces an error; unattributable lines
//! are dropped and stale state is reset at file boundaries.

use nom::{
    IResult, Parser,
    bytes::complete::tag,
    character::complete::{char as nom_char, u32 as nom_u32},
    combinator::opt,
    sequence::preceded,
};

/// Whether a changed line was added or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Addition,
    Deletion,
}

/// One atomic line-level edit extracted from a diff.
///
/// `line` refers to the new file for additions and the old file for
/// deletions. The two numbering spaces are distinct and never mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Repository-relative path (from the `+++ b/...` header)
    pub file: String,
    /// Line number in the relevant file version
    pub line: u32,
    pub kind: ChangeKind,
    /// Line content without its leading `+`/`-` marker
    pub text: String,
}

/// Scan state threaded through a single extraction.
///
/// All fields start unset and only become valid between a hunk header and the
/// next file or hunk boundary. A content line is emitted only when every
/// field is `Some`; otherwise it belongs to a header, a binary section, or is
/// otherwise unattributable and is dropped.
#[derive(Debug, Default)]
struct ParseCursor {
    file: Option<String>,
    old_line: Option<u32>,
    new_line: Option<u32>,
}

impl ParseCursor {
    /// Apply one diff line to the cursor, emitting a record if it is an
    /// attributable addition or deletion.
    ///
    /// Classification happens in strict priority order: file separator, new
    /// path, old path, binary marker, hunk header, then content.
    fn step(&mut self, line: &str) -> Option<ChangeRecord> {
        if line.starts_with("diff --git ") {
            // New file section; stale counters must not leak across files
            self.file = None;
            self.old_line = None;
            self.new_line = None;
            return None;
        }

        if let Some(path) = line.strip_prefix("+++ ") {
            // `/dev/null` (deleted file) has no `b/` prefix and leaves the
            // file unset, so such sections produce no records
            self.file = path
                .strip_prefix("b/")
                .filter(|p| !p.is_empty())
                .map(str::to_string);
            return None;
        }

        if line.starts_with("--- ") {
            // Old path is not tracked; deletions are numbered by counter
            return None;
        }

        if line.contains("Binary files") || line.starts_with("GIT binary patch") {
            self.file = None;
            self.old_line = None;
            self.new_line = None;
            return None;
        }

        if line.starts_with("@@ ") {
            match hunk_starts(line) {
                Ok((_, (old_start, new_start))) => {
                    self.old_line = Some(old_start);
                    self.new_line = Some(new_start);
                }
                Err(_) => {
                    // Fail-soft: drop content until the next valid header
                    self.old_line = None;
                    self.new_line = None;
                }
            }
            return None;
        }

        let (Some(file), Some(old_line), Some(new_line)) =
            (self.file.as_ref(), self.old_line, self.new_line)
        else {
            return None;
        };

        if line.is_empty() || line.starts_with("\\ No newline at end of file") {
            return None;
        }

        if let Some(text) = line.strip_prefix('+') {
            let record = ChangeRecord {
                file: file.clone(),
                line: new_line,
                kind: ChangeKind::Addition,
                text: text.to_string(),
            };
            // Counter exhaustion at u32::MAX unsets the counter, so later
            // lines are dropped instead of wrapping to an invalid number
            self.new_line = new_line.checked_add(1);
            return Some(record);
        }

        if let Some(text) = line.strip_prefix('-') {
            let record = ChangeRecord {
                file: file.clone(),
                line: old_line,
                kind: ChangeKind::Deletion,
                text: text.to_string(),
            };
            self.old_line = old_line.checked_add(1);
            return Some(record);
        }

        // Context lines should not occur with -U0, but keep the counters
        // aligned if they do
        self.old_line = old_line.checked_add(1);
        self.new_line = new_line.checked_add(1);
        None
    }
}

/// Parse the start positions from a hunk header like `@@ -10,2 +10,3 @@`.
///
/// Count parts are optional and ignored; only the starts matter since the
/// scan counts content lines itself.
fn hunk_starts(input: &str) -> IResult<&str, (u32, u32)> {
    let (rest, (_, old_start, _, _, new_start, _, _)) = (
        tag("@@ -"),
        nom_u32,
        opt(preceded(nom_char(','), nom_u32)),
        tag(" +"),
        nom_u32,
        opt(preceded(nom_char(','), nom_u32)),
        tag(" @@"),
    )
        .parse(input)?;

    Ok((rest, (old_start, new_start)))
}

/// Lazy iterator over the changes in one commit's diff text.
///
/// Yields records in the exact order their source lines appear; no sorting or
/// deduplication. Created by [`extract_changes`].
pub struct Changes<'a> {
    lines: std::str::Lines<'a>,
    cursor: ParseCursor,
}

impl Iterator for Changes<'_> {
    type Item = ChangeRecord;

    fn next(&mut self) -> Option<ChangeRecord> {
        for line in self.lines.by_ref() {
            if let Some(record) = self.cursor.step(line) {
                return Some(record);
            }
        }
        None
    }
}

/// Extract line-level changes from zero-context unified diff text.
///
/// The input is expected to be `git show`/`git diff` output produced with
/// `--unified=0 --no-renames --no-color` and no commit-message preamble, with
/// one or more file sections concatenated. Violations are not validated;
/// unattributable lines are silently dropped.
///
/// # Examples
/// ```
/// use git_chronicle::{ChangeKind, extract_changes};
///
/// let diff = "\
/// diff --git a/foo.txt b/foo.txt
/// --- a/foo.txt
/// +++ b/foo.txt
/// @@ -10,0 +10,2 @@
/// +first
/// +second
/// ";
/// let changes: Vec<_> = extract_changes(diff).collect();
/// assert_eq!(changes.len(), 2);
/// assert_eq!(changes[0].file, "foo.txt");
/// assert_eq!(changes[0].line, 10);
/// assert_eq!(changes[0].kind, ChangeKind::Addition);
/// assert_eq!(changes[1].line, 11);
/// ```
pub fn extract_changes(diff: &str) -> Changes<'_> {
    Changes {
        lines: diff.lines(),
        cursor: ParseCursor::default(),
    }
}
