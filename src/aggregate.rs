//! Ranked listening statistics from per-track deltas.
//!
//! Only tracks with a positive delta ("contributing tracks") take part in
//! rankings. Every ranking is a stable sort on plays, highest first, so ties
//! keep the order in which tracks, artists or albums were first seen in the
//! [`DeltaTable`].

use crate::config::RankingLimits;
use crate::delta::{DeltaRecord, DeltaTable};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A song ranked by plays gained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPlays {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub plays: u64,
    pub file: String,
}

impl From<&DeltaRecord> for SongPlays {
    fn from(record: &DeltaRecord) -> Self {
        Self {
            title: record.title.clone(),
            artist: record.artist.clone(),
            album: record.album.clone(),
            plays: record.delta,
            file: record.file.clone(),
        }
    }
}

/// An artist ranked by summed plays of their contributing tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistPlays {
    pub artist: String,
    pub plays: u64,
    /// Number of contributing tracks.
    pub tracks: usize,
}

/// The album with the most plays gained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumPlays {
    pub album: String,
    pub plays: u64,
    pub tracks: usize,
}

/// Everything the summary reports about play deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_play_deltas: u64,
    pub tracks_with_plays: usize,
    pub average_plays_per_played_track: f64,
    pub top_songs: Vec<SongPlays>,
    pub top_artists: Vec<ArtistPlays>,
    pub top_album: Option<AlbumPlays>,
}

/// Running per-key totals that remember first-seen order.
#[derive(Debug, Default)]
struct Tally {
    entries: Vec<(String, u64, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn add(&mut self, key: &str, plays: u64) {
        match self.index.get(key) {
            Some(&position) => {
                let entry = &mut self.entries[position];
                entry.1 = entry.1.saturating_add(plays);
                entry.2 += 1;
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), plays, 1));
            }
        }
    }

    /// Entries by plays, highest first; ties stay in first-seen order.
    fn ranked(mut self) -> Vec<(String, u64, usize)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
    }
}

/// Fold the delta table into ranked statistics.
///
/// # Examples
///
/// ```
/// use playtally::aggregate::aggregate_stats;
/// use playtally::config::RankingLimits;
/// use playtally::delta::compute_deltas;
/// use playtally::snapshot::Snapshot;
///
/// let empty = Snapshot::new();
/// let stats = aggregate_stats(&compute_deltas(&empty, &empty), &RankingLimits::default());
/// assert_eq!(stats.total_play_deltas, 0);
/// assert_eq!(stats.average_plays_per_played_track, 0.0);
/// assert!(stats.top_album.is_none());
/// ```
#[must_use]
pub fn aggregate_stats(deltas: &DeltaTable, limits: &RankingLimits) -> AggregateStats {
    let total_play_deltas = deltas.iter().fold(0u64, |total, d| total.saturating_add(d.delta));

    let mut by_artist = Tally::default();
    let mut by_album = Tally::default();
    let mut played: Vec<&DeltaRecord> = Vec::new();

    for record in deltas.iter().filter(|d| d.delta > 0) {
        by_artist.add(&record.artist, record.delta);
        by_album.add(&record.album, record.delta);
        played.push(record);
    }

    let tracks_with_plays = played.len();
    #[allow(clippy::cast_precision_loss)]
    let average_plays_per_played_track = match tracks_with_plays {
        0 => 0.0,
        count => total_play_deltas as f64 / count as f64,
    };

    played.sort_by(|a, b| b.delta.cmp(&a.delta));
    let top_songs = played
        .into_iter()
        .take(limits.top_songs)
        .map(SongPlays::from)
        .collect();

    let top_artists = by_artist
        .ranked()
        .into_iter()
        .take(limits.top_artists)
        .map(|(artist, plays, tracks)| ArtistPlays { artist, plays, tracks })
        .collect();

    let top_album = by_album
        .ranked()
        .into_iter()
        .next()
        .map(|(album, plays, tracks)| AlbumPlays { album, plays, tracks });

    debug!("Aggregated {total_play_deltas} plays over {tracks_with_plays} tracks");

    AggregateStats {
        total_play_deltas,
        tracks_with_plays,
        average_plays_per_played_track,
        top_songs,
        top_artists,
        top_album,
    }
}
