//! treemirror - one-way directory mirroring
//!
//! Copies new and changed files from a source tree into a destination tree,
//! removes destination files that no longer exist in the source and prunes
//! the directories left empty.

mod display;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use treemirror_config::{Config, ConfigLoader};
use treemirror_sync::{SyncEngine, TracingSink, ACTION_TARGET};
use treemirror_types::SyncConfiguration;

/// treemirror - mirror a source directory into a destination directory
#[derive(Parser, Debug)]
#[command(
    name = "treemirror",
    version = env!("CARGO_PKG_VERSION"),
    about = "Mirror a source directory into a destination directory",
    long_about = "treemirror copies new and changed files from SOURCE to DESTINATION,\n\
                  deletes destination files that are absent from SOURCE and removes\n\
                  the directories left empty. Files are compared by modification\n\
                  time and size."
)]
struct Cli {
    /// Source directory
    source: PathBuf,

    /// Destination directory (created if missing)
    destination: PathBuf,

    /// Pattern of source files never copied (repeatable)
    #[arg(long = "copy-exclude", value_name = "PATTERN")]
    copy_exclude: Vec<String>,

    /// Pattern of destination files never deleted (repeatable)
    #[arg(long = "delete-exclude", value_name = "PATTERN")]
    delete_exclude: Vec<String>,

    /// Print one line per copy, delete, skip and directory removal
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Show what would change without modifying the destination
    #[arg(long)]
    dry_run: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load_default().context("Failed to load configuration")?,
    };

    if !config.logging.colored_output {
        console::set_colors_enabled(false);
    }

    let sync_config = build_sync_configuration(&cli, &config);
    init_logging(&cli, &config.logging.level, sync_config.verbose_logging)?;

    info!("treemirror v{} starting", env!("CARGO_PKG_VERSION"));

    let engine = SyncEngine::with_sink(sync_config.clone(), Arc::new(TracingSink::new()))?;

    if !cli.quiet {
        display::display_header(&cli.source, &cli.destination, sync_config.dry_run);
    }

    let spinner = (!cli.quiet && !sync_config.verbose_logging).then(display::create_spinner);

    let start_time = Instant::now();
    let outcome = engine.sync(&cli.source, &cli.destination).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let result = outcome?;

    if !cli.quiet {
        display::display_result(&result, start_time.elapsed());
    }

    info!("Sync finished: {}", result);
    Ok(())
}

/// Combine configuration-file settings with command line flags
///
/// Flag patterns are appended after the configured ones; boolean switches are
/// enabled if either side enables them.
fn build_sync_configuration(cli: &Cli, config: &Config) -> SyncConfiguration {
    config
        .to_sync_configuration()
        .with_copy_exclusions(cli.copy_exclude.iter().cloned())
        .with_delete_exclusions(cli.delete_exclude.iter().cloned())
        .verbose((config.sync.verbose || cli.verbose) && !cli.quiet)
        .dry_run(config.sync.dry_run || cli.dry_run)
}

fn init_logging(cli: &Cli, configured_level: &str, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let directives = if cli.debug {
        "debug".to_string()
    } else if cli.quiet {
        "error".to_string()
    } else if verbose {
        format!("{},{}=info", configured_level, ACTION_TARGET)
    } else {
        configured_level.to_string()
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directives))
        .context("Invalid log filter")?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}
