//! Album Curator - gather photos and videos into one dated album
//!
//! Copies media from the given sources into
//! `<destination>/<year>-<month> <title>`, renaming each file
//! `<initials>_<index>` in modification-time order.

use album_curator::{
    Arguments, Cli, Config, Curator, ProcessingStatus, SystemClock, destination_inside_source,
};
use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{Level, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colored summary output for the terminal

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    /// Print a centered, bold title
    pub fn print_title(title: &str) {
        let padding = 60usize.saturating_sub(title.len()) / 2;
        let _ = stdout().execute(Print(" ".repeat(padding)));
        let _ = stdout().execute(Print(title.bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_key_value(key: &str, value: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: usize, color: Color) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(key).with(CliTheme::HINT)));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(style(value.to_string()).with(color).bold()));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print one processed file: status icon, source, destination
    pub fn print_result(status_icon: &str, status_color: Color, source: &str, dest: &str) {
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(style(status_icon).with(status_color).bold()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(source).italic()));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(style(dest).with(CliTheme::HINT)));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments; clap exits on malformed input
    let cli = Cli::parse();

    let guard = setup_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Album Curator starting");

    let config = load_config(&cli)?;
    if cli.verbose {
        info!(?config, "Configuration loaded");
    }

    let args = Arguments::resolve(&cli, &config, &SystemClock)?;
    warn_destination_inside_sources(&args);

    let mut curator = Curator::new(args, config, cli.dry_run);

    match curator.run() {
        Ok(results) => {
            use cli_output::*;

            print_separator();
            print_title(if cli.dry_run {
                "Dry Run Complete"
            } else {
                "Curation Complete"
            });
            print_separator();

            let stats = curator.stats();
            if let Some(destinations) = curator.destinations() {
                print_blank();
                if stats.images > 0 {
                    print_key_value("Album", &destinations.primary.display().to_string());
                }
                if stats.videos > 0 {
                    print_key_value("Videos", &destinations.videos.display().to_string());
                }
            }

            print_blank();
            print_stat("Images", stats.images, CliTheme::SUCCESS);
            print_stat("Videos", stats.videos, CliTheme::SUCCESS);
            print_stat("Ignored", stats.ignored, CliTheme::WARNING);
            print_blank();

            if cli.verbose {
                print_separator();
                for result in &results {
                    let source = result.source.display().to_string();
                    let dest = result
                        .destination
                        .as_ref()
                        .map(|p| format!("→ {}", p.display()))
                        .unwrap_or_else(|| "unknown file type".to_string());
                    match result.status {
                        ProcessingStatus::Copied => {
                            print_result("✓", CliTheme::SUCCESS, &source, &dest)
                        }
                        ProcessingStatus::DryRun => {
                            print_result("~", CliTheme::ACCENT, &source, &dest)
                        }
                        ProcessingStatus::Ignored => {
                            print_result("⊘", CliTheme::WARNING, &source, &dest)
                        }
                    }
                }
            }

            if cli.dry_run {
                print_separator();
                print_warning("Dry run: no directories were created and no files were copied");
            }

            info!("Curation complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Curation failed");
            eprintln!("Error: {}", e);
            drop(guard);
            std::process::exit(1);
        }
    }
}

/// Load configuration from file, or defaults when none is given
fn load_config(cli: &Cli) -> Result<Config> {
    let config = match cli.config {
        Some(ref config_path) => {
            info!(config_file = %config_path.display(), "Loading configuration from file");
            Config::load_from_file(config_path)?
        }
        None => Config::default(),
    };

    Ok(config)
}

/// Copies placed under a source are picked up again by later runs
fn warn_destination_inside_sources(args: &Arguments) {
    if let Some(source) = destination_inside_source(args) {
        warn!(
            destination = %args.destination.display(),
            source = %source.display(),
            "Destination is inside a source; later runs will include these copies"
        );
    }
}

/// Setup logging (console, plus an optional log file)
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    let Some(ref log_path) = cli.log_file else {
        subscriber.init();
        return Ok(None);
    };

    let file = open_log_file(log_path)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    Ok(file)
}
