//! Yearly listening statistics from music player play counts.
//!
//! Core modules:
//! - [`snapshot`] - Snapshot loading, yearly archiving and previous-year detection
//! - [`delta`] - Per-track play deltas between two snapshots
//! - [`aggregate`] - Ranked statistics (top songs, artists, album)
//! - [`summary`] - The year-in-review summary and the stats pipeline
//!
//! ### Supporting Modules
//!
//! - [`track`] - Raw and normalized track records
//! - [`playlist`] - M3U playlist generation from ranked songs
//! - [`config`] - Data directory and ranking limits
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```
//! use playtally::config::RankingLimits;
//! use playtally::snapshot::Snapshot;
//! use playtally::summary::summarize;
//! use playtally::track::TrackRecord;
//!
//! let track = |plays: u64| TrackRecord {
//!     identifier: "/music/artist/album/song.flac".to_string(),
//!     file: "/music/artist/album/song.flac".to_string(),
//!     title: "Song".to_string(),
//!     artist: "Artist".to_string(),
//!     album: "Album".to_string(),
//!     play_count: plays,
//!     last_played: None,
//! };
//!
//! let previous = Snapshot::from_records(vec![track(7)]);
//! let current = Snapshot::from_records(vec![track(10)]);
//!
//! let summary = summarize(&current, &previous, &RankingLimits::default());
//! assert_eq!(summary.deltas_summary.total_plays_this_year, 3);
//! assert_eq!(summary.top_lists.top_songs[0].plays, 3);
//! ```
//!
//! ## Delta Rules
//!
//! - A track missing from a snapshot counts as 0 plays there
//! - `delta = max(0, current - previous)`: resets never subtract plays
//! - Without a previous snapshot the current counts are the year's plays
//! - Rankings only consider tracks with a positive delta; ties keep the
//!   order tracks were first seen in (current snapshot first)
//!
//! ## Error Handling
//!
//! All fallible functions return `anyhow::Result`. Failures name the file and,
//! for malformed records, the record's position in it.

pub mod aggregate;
pub mod cli;
pub mod completion;
pub mod config;
pub mod delta;
pub mod playlist;
pub mod snapshot;
pub mod summary;
pub mod track;
