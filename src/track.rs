//! Track records as they appear in snapshot files and as the core sees them.
//!
//! A snapshot file holds [`RawTrack`]s, where every field may be absent.
//! Defaults are applied exactly once, in [`TrackRecord::from_raw`], so that
//! nothing downstream has to special-case missing metadata.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Placeholder for missing title, artist or album.
pub const UNKNOWN: &str = "Unknown";

/// One entry of a snapshot file, exactly as exported.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playcount: Option<i64>,
    /// Free-form last-played marker, carried through archiving untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastplayed: Option<serde_json::Value>,
}

/// A normalized track with a stable identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Key used to match the same track across snapshots.
    pub identifier: String,
    pub file: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub play_count: u64,
    /// Last-played marker as exported, rendered as text.
    pub last_played: Option<String>,
}

impl TrackRecord {
    /// Build a record from a raw entry. `index` is the entry's position in its
    /// file and only used for error messages.
    ///
    /// # Errors
    ///
    /// Fails if the entry has a negative play count, or has neither a
    /// non-empty `file` nor an artist or title to derive an identifier from.
    pub fn from_raw(raw: &RawTrack, index: usize) -> Result<Self> {
        let play_count = match raw.playcount {
            None => 0,
            Some(count) if count < 0 => {
                bail!("Record #{index} ({}) has a negative playcount: {count}", describe(raw))
            }
            Some(count) => count as u64,
        };

        let title = raw.title.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let artist = raw.artist.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let album = raw.album.clone().unwrap_or_else(|| UNKNOWN.to_string());

        let identifier = match raw.file.as_deref().filter(|f| !f.is_empty()) {
            Some(file) => file.to_string(),
            None if raw.artist.is_some() || raw.title.is_some() => format!("{artist} - {title}"),
            None => bail!(
                "Record #{index} has no usable identifier: it carries no file, artist or title"
            ),
        };

        Ok(Self {
            file: raw.file.clone().filter(|f| !f.is_empty()).unwrap_or_else(|| identifier.clone()),
            identifier,
            title,
            artist,
            album,
            play_count,
            last_played: raw.lastplayed.as_ref().map(|value| match value {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            }),
        })
    }
}

/// Short human description of a raw entry for diagnostics.
fn describe(raw: &RawTrack) -> String {
    match (&raw.file, &raw.artist, &raw.title) {
        (Some(file), _, _) if !file.is_empty() => format!("file '{file}'"),
        (_, artist, title) => format!(
            "'{} - {}'",
            artist.as_deref().unwrap_or(UNKNOWN),
            title.as_deref().unwrap_or(UNKNOWN)
        ),
    }
}

/// NFC-normalize a metadata string. Returns `None` when the text still holds
/// U+FFFD, i.e. it was decoded from invalid bytes somewhere upstream.
#[must_use]
pub fn normalize_text(value: &str) -> Option<String> {
    let normalized: String = value.nfc().collect();
    if normalized.contains('\u{FFFD}') {
        None
    } else {
        Some(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(file: Option<&str>, artist: Option<&str>, title: Option<&str>, playcount: Option<i64>) -> RawTrack {
        RawTrack {
            file: file.map(str::to_string),
            title: title.map(str::to_string),
            artist: artist.map(str::to_string),
            album: None,
            playcount,
            lastplayed: None,
        }
    }

    #[test]
    fn test_file_is_identifier() {
        let record = TrackRecord::from_raw(&raw(Some("/music/a.flac"), Some("A"), Some("T"), Some(3)), 0).unwrap();
        assert_eq!(record.identifier, "/music/a.flac");
        assert_eq!(record.file, "/music/a.flac");
        assert_eq!(record.album, UNKNOWN);
        assert_eq!(record.play_count, 3);
        assert_eq!(record.last_played, None);
    }

    #[test]
    fn test_last_played_is_carried_as_text() {
        let mut entry = raw(Some("/music/a.flac"), None, None, Some(1));
        entry.lastplayed = Some(serde_json::json!("Never"));
        let record = TrackRecord::from_raw(&entry, 0).unwrap();
        assert_eq!(record.last_played.as_deref(), Some("Never"));

        entry.lastplayed = Some(serde_json::json!(1700000000));
        let record = TrackRecord::from_raw(&entry, 0).unwrap();
        assert_eq!(record.last_played.as_deref(), Some("1700000000"));
    }

    #[test]
    fn test_artist_title_fallback() {
        let record = TrackRecord::from_raw(&raw(None, Some("Artist"), None, None), 0).unwrap();
        assert_eq!(record.identifier, "Artist - Unknown");
        assert_eq!(record.file, "Artist - Unknown");
        assert_eq!(record.play_count, 0);

        let empty_file = TrackRecord::from_raw(&raw(Some(""), None, Some("Song"), Some(1)), 0).unwrap();
        assert_eq!(empty_file.identifier, "Unknown - Song");
    }

    #[test]
    fn test_missing_identifier_is_rejected() {
        let err = TrackRecord::from_raw(&raw(None, None, None, Some(5)), 7).unwrap_err();
        assert!(err.to_string().contains("#7"));
    }

    #[test]
    fn test_negative_playcount_is_rejected() {
        let err = TrackRecord::from_raw(&raw(Some("x.flac"), None, None, Some(-2)), 3).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("#3"));
        assert!(message.contains("x.flac"));
    }

    #[test]
    fn test_normalize_text() {
        // "e" + combining acute composes to a single code point
        assert_eq!(normalize_text("Cafe\u{301}").as_deref(), Some("Caf\u{e9}"));
        assert_eq!(normalize_text("bad \u{FFFD} bytes"), None);
    }
}
