//! Per-track play deltas between two snapshots.

use crate::snapshot::Snapshot;
use crate::track::TrackRecord;
use log::debug;
use serde::{Deserialize, Serialize};

/// Play-count change of one track between the previous and current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaRecord {
    pub identifier: String,
    pub file: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub current_playcount: u64,
    pub previous_playcount: u64,
    /// Never negative: decreases (database resets, removed tracks) count as 0.
    pub delta: u64,
}

impl DeltaRecord {
    fn new(current: Option<&TrackRecord>, previous: Option<&TrackRecord>) -> Option<Self> {
        let source = current.or(previous)?;
        let current_playcount = current.map_or(0, |r| r.play_count);
        let previous_playcount = previous.map_or(0, |r| r.play_count);

        Some(Self {
            identifier: source.identifier.clone(),
            file: source.file.clone(),
            title: source.title.clone(),
            artist: source.artist.clone(),
            album: source.album.clone(),
            current_playcount,
            previous_playcount,
            delta: current_playcount.saturating_sub(previous_playcount),
        })
    }

    /// Absent from the previous snapshot (or unplayed there) and played now.
    pub fn is_new(&self) -> bool {
        self.previous_playcount == 0 && self.current_playcount > 0
    }

    /// Played in the previous snapshot and gone (or reset) now.
    pub fn is_removed(&self) -> bool {
        self.previous_playcount > 0 && self.current_playcount == 0
    }
}

/// Delta records for the union of two snapshots, in a fixed order: the
/// current snapshot's tracks first, then tracks only found in the previous
/// one. Rankings break ties by this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaTable {
    records: Vec<DeltaRecord>,
}

impl DeltaTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeltaRecord> {
        self.records.iter()
    }

    pub fn get(&self, identifier: &str) -> Option<&DeltaRecord> {
        self.records.iter().find(|r| r.identifier == identifier)
    }
}

/// Compare `current` against `previous` (which may be empty).
#[must_use]
pub fn compute_deltas(current: &Snapshot, previous: &Snapshot) -> DeltaTable {
    let from_current = current
        .iter()
        .filter_map(|record| DeltaRecord::new(Some(record), previous.get(&record.identifier)));
    let only_previous = previous
        .iter()
        .filter(|record| !current.contains(&record.identifier))
        .filter_map(|record| DeltaRecord::new(None, Some(record)));

    let records: Vec<DeltaRecord> = from_current.chain(only_previous).collect();
    debug!(
        "Computed {} deltas ({} current, {} previous tracks)",
        records.len(),
        current.len(),
        previous.len()
    );

    DeltaTable { records }
}
