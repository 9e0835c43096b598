//! Console output for the treemirror CLI

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use treemirror_types::SyncResult;

/// Announce the sync about to run
pub fn display_header(source: &Path, destination: &Path, dry_run: bool) {
    println!(
        "{} Mirroring {} to {}",
        style("⟲").blue().bold(),
        style(source.display()).cyan(),
        style(destination.display()).cyan()
    );

    if dry_run {
        println!(
            "{} Dry run mode - no changes will be made",
            style("ℹ").yellow()
        );
    }
}

/// Spinner shown while the engine works
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message("Synchronizing...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Print the result counters
pub fn display_result(result: &SyncResult, elapsed: Duration) {
    println!();
    println!("{}", style("Sync Summary:").bold().underlined());
    println!("  Files copied: {}", style(result.copied).green());
    println!("  Files deleted: {}", style(result.deleted).red());
    println!("  Files skipped: {}", style(result.skipped).yellow());
    println!("  Duration: {}", style(format_duration(elapsed)).blue());
}

/// Format a duration for humans
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{:.2}s", duration.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
