//! # Command-Line Interface Module
//!
//! This module defines the command-line interface for Playtally using Clap
//! derive macros.
//!
//! ## Commands
//!
//! - `archive`: File an exported play-count snapshot under its year
//! - `stats`: Compare a snapshot with last year's and write the summary
//! - `playlist`: Write an M3U playlist of the top songs
//! - `completion`: Generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! playtally archive export.json --min-playcount 1
//! playtally stats ~/.local/share/playtally/playcounts/2025/playcounts.json
//! playtally playlist ~/.local/share/playtally/playcounts/2025/stats.json
//! ```

use crate::playlist::{DEFAULT_LIMIT, DEFAULT_PLAYLIST_NAME};
use crate::snapshot::DEFAULT_SNAPSHOT_NAME;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser)]
#[command(name = "playtally")]
#[command(about = "Playtally: yearly play-count snapshots, deltas and top lists for your music library")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// File an exported snapshot into the yearly folder layout
    ///
    /// Drops entries with unreadable metadata or too few plays, normalizes
    /// text and sorts by play count before writing `<root>/<year>/<name>`.
    Archive {
        /// Exported JSON list of tracks with play counts
        export: PathBuf,

        /// Directory holding the per-year folders
        ///
        /// Defaults to the platform data directory
        /// (e.g. ~/.local/share/playtally/playcounts).
        #[arg(long, env = "PLAYTALLY_ROOT")]
        root: Option<PathBuf>,

        /// Year folder to file the snapshot under (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// File name inside the year folder
        #[arg(short, long, default_value = DEFAULT_SNAPSHOT_NAME)]
        name: String,

        /// Skip tracks played fewer times than this
        #[arg(short, long, default_value = "0")]
        min_playcount: u64,
    },

    /// Compute this year's statistics from a snapshot
    ///
    /// Play deltas are measured against the previous year's snapshot, found
    /// in the sibling year folder unless given explicitly. Without one, the
    /// current snapshot counts as the full year.
    Stats {
        /// Current snapshot (e.g. playcounts/2025/playcounts.json)
        input: PathBuf,

        /// Previous year's snapshot (overrides auto-detection)
        #[arg(short, long)]
        previous: Option<PathBuf>,

        /// Output JSON path (default: stats.json next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an M3U playlist from a summary or snapshot
    Playlist {
        /// stats.json summary or playcounts.json snapshot
        input: PathBuf,

        /// Output playlist path
        #[arg(short, long, default_value = DEFAULT_PLAYLIST_NAME)]
        output: PathBuf,

        /// Maximum number of entries considered
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Generate shell completions
    ///
    /// Usage: playtally completion bash > ~/.local/share/bash-completion/completions/playtally
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
