use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "reconcile-lists", version)]
#[command(
    about = "Plan the copies that bring a destination file list in sync with a source file list",
    long_about = None
)]
#[command(after_help = "Snapshot lines are formatted as parentFolder|filename|size|contentId|fullPath")]
pub struct Cli {
    /// Snapshot of the source tree
    pub source: PathBuf,
    /// Snapshot of the destination tree
    pub dest: PathBuf,
    /// Also compare shared folders by canonical file name
    #[arg(long)]
    pub by_name: bool,
    /// Directory the action script is written to
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Configuration file (default: ./Config.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Process exit status for an argument parsing outcome: help and version
/// requests succeed, every usage error exits 1.
pub fn exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_requires_both_snapshots() {
        assert!(Cli::try_parse_from(["reconcile-lists", "source.txt"]).is_err());
        assert!(Cli::try_parse_from(["reconcile-lists", "a", "b", "c"]).is_err());

        let cli = Cli::try_parse_from(["reconcile-lists", "a", "b", "--by-name"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("a"));
        assert_eq!(cli.dest, PathBuf::from("b"));
        assert!(cli.by_name);
        assert!(cli.output_dir.is_none());
    }

    fn parse_exit_code(args: &[&str]) -> i32 {
        match Cli::try_parse_from(args) {
            Ok(_) => panic!("expected {:?} to stop argument parsing", args),
            Err(err) => exit_code(&err),
        }
    }

    #[test]
    fn test_usage_errors_exit_one() {
        assert_eq!(parse_exit_code(&["reconcile-lists"]), 1);
        assert_eq!(parse_exit_code(&["reconcile-lists", "source.txt"]), 1);
        assert_eq!(parse_exit_code(&["reconcile-lists", "a", "b", "c"]), 1);
        assert_eq!(parse_exit_code(&["reconcile-lists", "a", "b", "--bogus"]), 1);
    }

    #[test]
    fn test_help_and_version_exit_zero() {
        assert_eq!(parse_exit_code(&["reconcile-lists", "--help"]), 0);
        assert_eq!(parse_exit_code(&["reconcile-lists", "-h"]), 0);
        assert_eq!(parse_exit_code(&["reconcile-lists", "--version"]), 0);
    }
}
