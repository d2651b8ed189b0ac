use chrono_tz::Tz;
use error_set::error_set;
use std::path::Path;
use std::process::Command;

mod extract;
mod log;
mod report;

pub use extract::{ChangeKind, ChangeRecord, Changes, extract_changes};
pub use log::{CommitRecord, LogOptions};
pub use report::{format_timestamp, render};

error_set! {
    /// Top-level error for git-chronicle operations
    GitChronicleError := {
        #[display("Failed to write {path}: {message}")]
        WriteFailed { path: String, message: String },
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Not a git repository (or no access to git): {path}")]
        NotARepository { path: String },
        #[display("Failed to run git {command}: {message}")]
        SpawnFailed { command: &'static str, message: String },
        #[display("git {command} failed: {stderr}")]
        ExitError { command: &'static str, stderr: String },
        #[display("Invalid UTF-8 in git {command} output: {message}")]
        InvalidUtf8 { command: &'static str, message: String },
    }
}

/// Main interface for reading a repository's history.
///
/// Owns the subprocess calls that produce the extractor's input: a
/// first-parent commit listing and, per commit, a zero-context diff against
/// the primary parent.
pub struct GitHistory<'a> {
    repo_path: &'a str,
}

impl<'a> GitHistory<'a> {
    /// Create a new GitHistory for the given repository path
    pub fn new(repo_path: &'a str) -> Self {
        Self { repo_path }
    }

    /// Verify the path is inside a git work tree
    pub fn ensure_repository(&self) -> Result<(), GitCommandError> {
        self.run_git("rev-parse", &["rev-parse", "--is-inside-work-tree"])
            .map_err(|e| match e {
                GitCommandError::ExitError { .. } => GitCommandError::NotARepository {
                    path: self.repo_path.to_string(),
                },
                other => other,
            })?;
        Ok(())
    }

    /// List first-parent commits, most recent first.
    ///
    /// Malformed log lines are dropped rather than surfaced; the pretty
    /// format is machine-generated, so a bad line means truncated output.
    pub fn commits(&self, options: &LogOptions) -> Result<Vec<CommitRecord>, GitCommandError> {
        let mut args = vec![
            "log".to_string(),
            format!("--pretty={}", log::LOG_FORMAT),
            "--no-color".to_string(),
            "--first-parent".to_string(),
        ];
        if let Some(limit) = options.limit {
            args.push(format!("-n{limit}"));
        }
        if let Some(author) = &options.author {
            args.push(format!("--author={author}"));
        }

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Ok(log::parse_log(&self.run_git("log", &args)?))
    }

    /// Raw zero-context diff of one commit against its first parent.
    ///
    /// `--unified=0 --no-renames --pretty=format: --no-color` is the
    /// extractor's input contract: every content line is strictly an
    /// addition or deletion, with no commit-message preamble.
    pub fn commit_diff(&self, hash: &str) -> Result<String, GitCommandError> {
        self.run_git(
            "show",
            &[
                "show",
                "--first-parent",
                "--no-renames",
                "--unified=0",
                "--pretty=format:",
                "--no-color",
                hash,
            ],
        )
    }

    /// Render the Markdown report for the given commits.
    ///
    /// Commit order is preserved; commits whose diff yields no changes are
    /// omitted by the formatter.
    pub fn render_history(
        &self,
        commits: &[CommitRecord],
        timezone: Tz,
    ) -> Result<String, GitCommandError> {
        let mut entries = Vec::with_capacity(commits.len());
        for commit in commits {
            let diff = self.commit_diff(&commit.hash)?;
            let changes: Vec<ChangeRecord> = extract_changes(&diff).collect();
            entries.push((commit.clone(), changes));
        }
        Ok(report::render(&entries, timezone))
    }

    /// Render the report and write it to `output`
    pub fn write_history(
        &self,
        commits: &[CommitRecord],
        timezone: Tz,
        output: &Path,
    ) -> Result<(), GitChronicleError> {
        let rendered = self.render_history(commits, timezone)?;
        std::fs::write(output, rendered).map_err(|e| GitChronicleError::WriteFailed {
            path: output.display().to_string(),
            message: e.to_string(),
        })
    }

    fn run_git(&self, command: &'static str, args: &[&str]) -> Result<String, GitCommandError> {
        let output = Command::new("git")
            .args(["-C", self.repo_path])
            .args(args)
            .output()
            .map_err(|e| GitCommandError::SpawnFailed {
                command,
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ExitError {
                command,
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            command,
            message: e.to_string(),
        })
    }
}
