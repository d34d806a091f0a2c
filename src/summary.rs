//! # Summary Module
//!
//! Assembles the yearly summary from the two snapshots, their deltas and the
//! aggregated statistics, and runs the whole stats pipeline for the CLI.
//!
//! The serialized shape is stable: field names below are what ends up in
//! `stats.json`.

use crate::aggregate::{aggregate_stats, AggregateStats, AlbumPlays, ArtistPlays, SongPlays};
use crate::config::RankingLimits;
use crate::delta::{compute_deltas, DeltaTable};
use crate::snapshot::{self, Snapshot};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default file name of the summary, written next to the current snapshot.
pub const DEFAULT_SUMMARY_NAME: &str = "stats.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub current_snapshot_tracks: usize,
    pub previous_snapshot_tracks: usize,
    pub new_tracks_count: usize,
    pub removed_tracks_count: usize,
    pub tracks_added_list_sample: Vec<String>,
    pub tracks_removed_list_sample: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltasSummary {
    pub total_plays_this_year: u64,
    pub tracks_with_plays_this_year: usize,
    pub average_plays_per_played_track: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLists {
    #[serde(rename = "top_5_artists")]
    pub top_artists: Vec<ArtistPlays>,
    pub top_album: Option<AlbumPlays>,
    #[serde(rename = "top_100_songs")]
    pub top_songs: Vec<SongPlays>,
}

/// The year in review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub metadata: SnapshotMetadata,
    pub deltas_summary: DeltasSummary,
    pub top_lists: TopLists,
    pub per_song_deltas_count: usize,
}

/// Build the summary. Aggregate fields are copied from `stats` untouched.
///
/// New and removed tracks are listed in delta-table order; only the first
/// `limits.sample_size` of each are kept, the counts are not capped.
#[must_use]
pub fn build_summary(
    current: &Snapshot,
    previous: &Snapshot,
    deltas: &DeltaTable,
    stats: AggregateStats,
    limits: &RankingLimits,
) -> Summary {
    let new_tracks: Vec<&str> = deltas
        .iter()
        .filter(|d| d.is_new())
        .map(|d| d.identifier.as_str())
        .collect();
    let removed_tracks: Vec<&str> = deltas
        .iter()
        .filter(|d| d.is_removed())
        .map(|d| d.identifier.as_str())
        .collect();

    let sample = |ids: &[&str]| -> Vec<String> {
        ids.iter().take(limits.sample_size).map(|id| (*id).to_string()).collect()
    };

    Summary {
        metadata: SnapshotMetadata {
            current_snapshot_tracks: current.len(),
            previous_snapshot_tracks: previous.len(),
            new_tracks_count: new_tracks.len(),
            removed_tracks_count: removed_tracks.len(),
            tracks_added_list_sample: sample(&new_tracks),
            tracks_removed_list_sample: sample(&removed_tracks),
        },
        deltas_summary: DeltasSummary {
            total_plays_this_year: stats.total_play_deltas,
            tracks_with_plays_this_year: stats.tracks_with_plays,
            average_plays_per_played_track: stats.average_plays_per_played_track,
        },
        top_lists: TopLists {
            top_artists: stats.top_artists,
            top_album: stats.top_album,
            top_songs: stats.top_songs,
        },
        per_song_deltas_count: deltas.len(),
    }
}

/// Delta, aggregate and summarize two in-memory snapshots.
#[must_use]
pub fn summarize(current: &Snapshot, previous: &Snapshot, limits: &RankingLimits) -> Summary {
    let deltas = compute_deltas(current, previous);
    let stats = aggregate_stats(&deltas, limits);
    build_summary(current, previous, &deltas, stats, limits)
}

/// Result of [`run_stats`].
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub summary: Summary,
    pub output: PathBuf,
    /// Previous snapshot actually used, if any.
    pub previous: Option<PathBuf>,
}

/// Load the current snapshot (and the previous one, explicit or detected),
/// summarize them and write the summary as JSON.
///
/// `output` defaults to `stats.json` next to `current`.
pub fn run_stats(
    current: &Path,
    previous: Option<&Path>,
    output: Option<&Path>,
    limits: &RankingLimits,
) -> Result<StatsReport> {
    if !current.exists() {
        anyhow::bail!("Input file not found: {}", current.display());
    }

    let previous = snapshot::resolve_previous_path(current, previous);

    let current_snapshot = snapshot::load_snapshot(current)?;
    let previous_snapshot = match &previous {
        Some(path) => snapshot::load_snapshot(path)?,
        None => Snapshot::new(),
    };

    let summary = summarize(&current_snapshot, &previous_snapshot, limits);

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => current
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(DEFAULT_SUMMARY_NAME),
    };
    snapshot::write_json(&summary, &output)?;
    info!("Saved stats to {}", output.display());

    Ok(StatsReport {
        summary,
        output,
        previous,
    })
}

/// Read a summary written by [`run_stats`].
pub fn load_summary(path: &Path) -> Result<Summary> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open summary file {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Summary file {} is malformed", path.display()))
}
