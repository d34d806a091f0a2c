//! # Playtally
//!
//! Yearly play-count snapshots of a music library, with year-over-year
//! deltas, top lists and playlists.
//!
//! ## Usage
//!
//! ```bash
//! # File this year's export
//! playtally archive export.json
//!
//! # Compare with last year and write stats.json
//! playtally stats ~/.local/share/playtally/playcounts/2025/playcounts.json
//!
//! # Turn the top songs into a playlist
//! playtally playlist ~/.local/share/playtally/playcounts/2025/stats.json
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use playtally::config::{RankingLimits, RuntimeConfig};
use playtally::snapshot::ArchiveOptions;
use playtally::{cli, completion, playlist, snapshot, summary};

/// Main entry point for the Playtally application.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the library.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug playtally stats ...` - Enable debug logging
/// - `RUST_LOG=playtally::snapshot=debug playtally stats ...` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Archive { export, root, year, name, min_playcount } => {
            let config = match root {
                Some(root) => RuntimeConfig::with_root(root),
                None => RuntimeConfig::new()?,
            };
            info!("Archiving {} under {}", export.display(), config.snapshot_root.display());

            let options = ArchiveOptions {
                year,
                file_name: name,
                min_playcount,
                ..ArchiveOptions::new(config.snapshot_root)
            };
            let report = snapshot::archive_snapshot(&export, &options)?;

            println!("Saved {} tracks to {}", report.kept, report.path.display());
            if report.skipped > 0 {
                eprintln!("Skipped {} songs due to malformed metadata", report.skipped);
            }
        }
        cli::Command::Stats { input, previous, output } => {
            let report = summary::run_stats(
                &input,
                previous.as_deref(),
                output.as_deref(),
                &RankingLimits::default(),
            )?;

            println!("Saved stats to {}", report.output.display());
            match &report.previous {
                Some(path) => println!("Used previous snapshot: {}", path.display()),
                None => println!(
                    "No previous snapshot found; stats treat current snapshot as full-year totals."
                ),
            }
        }
        cli::Command::Playlist { input, output, limit } => {
            let report = playlist::generate_playlist(&input, &output, limit)?;
            println!("Wrote {} tracks to {}", report.written, report.output.display());
            if !report.missing.is_empty() || report.unlisted > 0 {
                println!(
                    "Skipped {} missing files and {} entries without a file path",
                    report.missing.len(),
                    report.unlisted
                );
            }
        }
        cli::Command::Completion { shell } => {
            completion::print_completions(shell);
        }
    }

    Ok(())
}
