use chrono_tz::Tz;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use git_chronicle::{GitChronicleError, GitHistory, LogOptions};

#[derive(Parser)]
#[command(name = "git-chronicle")]
#[command(version)]
#[command(about = "Render first-parent git history as a line-level Markdown change log")]
struct Cli {
    /// Repository to read
    #[arg(short = 'C', long, default_value = ".", value_name = "PATH")]
    repo: String,

    /// Limit to the N most recent commits
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Author filter passed to `git log --author` (regex allowed)
    #[arg(long, value_name = "PATTERN")]
    author: Option<String>,

    /// Output file
    #[arg(short, long, default_value = "history.md", value_name = "FILE")]
    output: PathBuf,

    /// IANA timezone for displayed timestamps
    #[arg(long, default_value = "America/New_York", value_name = "TZ")]
    timezone: Tz,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), GitChronicleError> {
    let history = GitHistory::new(&cli.repo);
    history.ensure_repository()?;

    let options = LogOptions {
        limit: cli.limit,
        author: cli.author.clone(),
    };

    let commits = history.commits(&options)?;
    if commits.is_empty() {
        // Informational outcome, not an error
        match &cli.author {
            Some(author) => eprintln!("No commits found for author filter: {author:?}."),
            None => eprintln!("No commits found."),
        }
        return Ok(());
    }

    history.write_history(&commits, cli.timezone, &cli.output)?;
    println!("Wrote {}", cli.output.display());
    Ok(())
}
