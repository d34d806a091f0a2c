//! # Snapshot Module
//!
//! A snapshot is a point-in-time capture of per-track play counts, keyed by
//! track identifier. This module loads snapshots from exported JSON files,
//! files exports into the yearly directory layout, and finds the previous
//! year's snapshot next to the current one.
//!
//! ## Yearly Layout
//!
//! ```text
//! <root>/
//! ├── 2024/playcounts.json
//! └── 2025/playcounts.json   <- current; 2024 is detected as previous
//! ```

use crate::track::{normalize_text, RawTrack, TrackRecord};
use anyhow::{bail, Context, Result};
use chrono::Datelike;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default file name of a snapshot inside a year directory.
pub const DEFAULT_SNAPSHOT_NAME: &str = "playcounts.json";

/// Ordered mapping from identifier to [`TrackRecord`].
///
/// Iteration follows first-insertion order. Inserting a record whose
/// identifier is already present replaces the earlier record in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Vec<TrackRecord>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from records in order; later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = TrackRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    /// Normalize raw entries and build a snapshot from them.
    ///
    /// # Errors
    ///
    /// Fails on the first entry that has no usable identifier or a negative
    /// play count, naming its position.
    pub fn from_raw(raw: &[RawTrack]) -> Result<Self> {
        let records = raw
            .iter()
            .enumerate()
            .map(|(index, entry)| TrackRecord::from_raw(entry, index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_records(records))
    }

    pub fn insert(&mut self, record: TrackRecord) {
        match self.index.get(&record.identifier) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index.insert(record.identifier.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&TrackRecord> {
        self.index.get(identifier).map(|&position| &self.records[position])
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRecord> {
        self.records.iter()
    }
}

/// Read the raw entries of a snapshot file.
pub fn load_raw(path: &Path) -> Result<Vec<RawTrack>> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open snapshot file {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Snapshot file {} is not valid JSON", path.display()))?;

    if !value.is_array() {
        bail!("Snapshot file {} must hold a JSON array of track records", path.display());
    }

    serde_json::from_value(value)
        .with_context(|| format!("Snapshot file {} holds a malformed track record", path.display()))
}

/// Load and normalize a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = load_raw(path)?;
    let snapshot = Snapshot::from_raw(&raw)
        .with_context(|| format!("Invalid track record in {}", path.display()))?;
    debug!("Loaded {} tracks ({} entries) from {}", snapshot.len(), raw.len(), path.display());
    Ok(snapshot)
}

/// Guess the previous year's snapshot path from the current one.
///
/// Scans the ancestors of `current` from the outermost inwards; the first
/// directory named with exactly four digits is taken as the year, and the
/// result is `<its parent>/<year - 1>/<file name of current>`. Existence is
/// not checked.
#[must_use]
pub fn detect_previous_path(current: &Path) -> Option<PathBuf> {
    let file_name = current.file_name()?;
    let ancestors: Vec<&Path> = current.ancestors().skip(1).collect();

    for dir in ancestors.into_iter().rev() {
        let Some(year) = dir.file_name().and_then(|name| name.to_str()).and_then(parse_year) else {
            continue;
        };
        let parent = dir.parent().unwrap_or_else(|| Path::new(""));
        return Some(parent.join((year - 1).to_string()).join(file_name));
    }

    None
}

fn parse_year(name: &str) -> Option<i32> {
    if name.len() == 4 && name.bytes().all(|b| b.is_ascii_digit()) {
        name.parse().ok()
    } else {
        None
    }
}

/// Decide which previous snapshot to use, if any.
///
/// An explicit path wins over detection; a missing explicit path is warned
/// about and ignored. A detected path is only used when it exists.
pub fn resolve_previous_path(current: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        warn!(
            "Explicit previous snapshot not found: {}, continuing without previous snapshot",
            path.display()
        );
        return None;
    }

    let detected = detect_previous_path(current)?;
    if detected.exists() {
        debug!("Detected previous snapshot at {}", detected.display());
        Some(detected)
    } else {
        debug!("No previous snapshot at {}", detected.display());
        None
    }
}

/// Options for [`archive_snapshot`].
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Directory holding the per-year folders.
    pub root: PathBuf,
    /// Target year, current local year if unset.
    pub year: Option<i32>,
    pub file_name: String,
    /// Entries played fewer times than this are dropped.
    pub min_playcount: u64,
}

impl ArchiveOptions {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            year: None,
            file_name: DEFAULT_SNAPSHOT_NAME.to_string(),
            min_playcount: 0,
        }
    }
}

/// Outcome of an archive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub kept: usize,
    /// Below `min_playcount`, or with a negative play count.
    pub filtered: usize,
    /// Unreadable metadata.
    pub skipped: usize,
}

/// Clean an exported snapshot and store it under `<root>/<year>/<file_name>`.
///
/// Entries whose title, artist, album or file is missing, empty or not valid
/// text are skipped; text is NFC-normalized. Kept entries are sorted by play count,
/// highest first.
pub fn archive_snapshot(export: &Path, options: &ArchiveOptions) -> Result<ArchiveReport> {
    let raw = load_raw(export)?;
    let total = raw.len();

    let mut filtered = 0;
    let mut skipped = 0;
    let mut kept = Vec::with_capacity(total);

    for (index, entry) in raw.into_iter().enumerate() {
        let playcount = entry.playcount.unwrap_or(0);
        if playcount < 0 {
            debug!("Dropping record #{index} with negative playcount {playcount}");
            filtered += 1;
            continue;
        }
        if (playcount as u64) < options.min_playcount {
            filtered += 1;
            continue;
        }

        match clean_entry(entry, playcount) {
            Some(cleaned) => kept.push(cleaned),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} of {total} songs due to malformed metadata");
    }

    kept.sort_by(|a, b| b.playcount.cmp(&a.playcount));

    let year = options.year.unwrap_or_else(|| chrono::Local::now().year());
    let dir = options.root.join(year.to_string());
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
    let path = dir.join(&options.file_name);

    write_json(&kept, &path)?;
    info!("Saved {} tracks to {}", kept.len(), path.display());

    Ok(ArchiveReport {
        path,
        kept: kept.len(),
        filtered,
        skipped,
    })
}

fn clean_entry(entry: RawTrack, playcount: i64) -> Option<RawTrack> {
    let clean = |value: Option<String>| {
        value
            .as_deref()
            .and_then(normalize_text)
            .filter(|text| !text.is_empty())
    };

    Some(RawTrack {
        file: Some(clean(entry.file)?),
        title: Some(clean(entry.title)?),
        artist: Some(clean(entry.artist)?),
        album: Some(clean(entry.album)?),
        playcount: Some(playcount),
        lastplayed: entry.lastplayed,
    })
}

/// Write a value as pretty-printed JSON, keeping non-ASCII text as-is.
pub fn write_json<T: serde::Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to serialize JSON to {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
