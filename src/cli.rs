//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Album Curator - gather photos and videos into one dated album
///
/// Copies every recognized image and video found in the sources (and all
/// of their subdirectories) into `<destination>/<year>-<month> <title>`,
/// renaming them `<initials>_<index>` in modification-time order.
#[derive(Parser, Debug)]
#[command(name = "album-curator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory that receives the album folder
    pub destination: PathBuf,

    /// Directories to collect media from (scanned recursively)
    #[arg(required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Filename prefix (default: the uppercase letters of the title)
    #[arg(long)]
    pub initials: Option<String>,

    /// Album title (default: "Album")
    #[arg(long)]
    pub title: Option<String>,

    /// Album year (default: current year)
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..=9999))]
    pub year: Option<u16>,

    /// Album month (default: current month)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
    pub month: Option<u8>,

    /// Path to configuration file (TOML format)
    ///
    /// Settings from the file are used as defaults; CLI arguments
    /// override them.
    #[arg(short = 'C', long, env = "ALBUM_CURATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dry run mode - show what would be done without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Output log file format as JSON
    #[arg(long, requires = "log_file")]
    pub json_log: bool,
}

impl Cli {
    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref title) = self.title {
            config.title = title.clone();
        }
        if let Some(ref initials) = self.initials {
            config.initials = Some(initials.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["album-curator", "out", "a", "b"]).unwrap();
        assert_eq!(cli.destination, PathBuf::from("out"));
        assert_eq!(cli.sources, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(cli.title.is_none());
        assert!(cli.initials.is_none());
        assert!(cli.year.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_parse_requires_source() {
        assert!(Cli::try_parse_from(["album-curator", "out"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_dates() {
        assert!(Cli::try_parse_from(["album-curator", "out", "a", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["album-curator", "out", "a", "--month", "0"]).is_err());
        assert!(Cli::try_parse_from(["album-curator", "out", "a", "--year", "10000"]).is_err());
        assert!(Cli::try_parse_from(["album-curator", "out", "a", "--year", "soon"]).is_err());
    }

    #[test]
    fn test_merge_with_config() {
        let cli =
            Cli::try_parse_from(["album-curator", "out", "a", "--title", "Beach Day"]).unwrap();
        let config = Config {
            title: "Ignored".into(),
            initials: Some("XY".into()),
            ..Config::default()
        };

        let merged = cli.merge_with_config(config);
        assert_eq!(merged.title, "Beach Day");
        assert_eq!(merged.initials.as_deref(), Some("XY"));
    }
}
