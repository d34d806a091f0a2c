//! M3U playlist generation from ranked songs.
//!
//! The input is either a summary (`stats.json`, its top songs in rank order)
//! or a snapshot file (entries in stored order, which `archive` sorts by
//! play count). Only files that exist on disk make it into the playlist.

use crate::summary::Summary;
use crate::track::RawTrack;
use anyhow::{bail, Context, Result};
use log::{info, warn};
use path_absolutize::Absolutize;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default playlist length.
pub const DEFAULT_LIMIT: usize = 100;

/// Default output file name.
pub const DEFAULT_PLAYLIST_NAME: &str = "Top_Songs.m3u";

/// Outcome of writing a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistReport {
    pub output: PathBuf,
    pub written: usize,
    /// Listed files that do not exist.
    pub missing: Vec<String>,
    /// Entries without a file path.
    pub unlisted: usize,
}

/// Track files listed by a summary or snapshot file, best first.
pub fn read_candidates(input: &Path) -> Result<Vec<Option<String>>> {
    let file = fs::File::open(input)
        .with_context(|| format!("Failed to open playlist source {}", input.display()))?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Playlist source {} is not valid JSON", input.display()))?;

    if value.is_array() {
        let raw: Vec<RawTrack> = serde_json::from_value(value)
            .with_context(|| format!("Snapshot file {} has malformed records", input.display()))?;
        return Ok(raw.into_iter().map(|entry| entry.file).collect());
    }

    if value.is_object() {
        let summary: Summary = serde_json::from_value(value)
            .with_context(|| format!("{} is neither a snapshot nor a summary", input.display()))?;
        return Ok(summary
            .top_lists
            .top_songs
            .into_iter()
            .map(|song| Some(song.file))
            .collect());
    }

    bail!("{} is neither a snapshot nor a summary", input.display())
}

/// Write an extended M3U with the absolute paths of the first `limit`
/// candidates that exist.
pub fn write_playlist(
    candidates: &[Option<String>],
    output: &Path,
    limit: usize,
) -> Result<PlaylistReport> {
    let file = fs::File::create(output)
        .with_context(|| format!("Failed to create playlist {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "#EXTM3U")?;

    let mut written = 0;
    let mut missing = Vec::new();
    let mut unlisted = 0;

    for candidate in candidates.iter().take(limit) {
        let Some(track) = candidate.as_deref().filter(|f| !f.is_empty()) else {
            warn!("Skipping entry without a file path");
            unlisted += 1;
            continue;
        };

        let path = Path::new(track);
        if !path.exists() {
            warn!("Missing file: {track}");
            missing.push(track.to_string());
            continue;
        }

        let absolute = path
            .absolutize()
            .with_context(|| format!("Failed to resolve absolute path of {track}"))?;
        writeln!(writer, "{}", absolute.display())?;
        written += 1;
    }

    writer.flush()
        .with_context(|| format!("Failed to write playlist {}", output.display()))?;
    info!("Wrote {written} tracks to {}", output.display());

    Ok(PlaylistReport {
        output: output.to_path_buf(),
        written,
        missing,
        unlisted,
    })
}

/// Read `input` and write its playlist to `output`.
pub fn generate_playlist(input: &Path, output: &Path, limit: usize) -> Result<PlaylistReport> {
    let candidates = read_candidates(input)?;
    write_playlist(&candidates, output, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_playlist_skips_missing_files() -> Result<()> {
        let dir = TempDir::new()?;
        let present = dir.path().join("present.flac");
        fs::write(&present, b"")?;
        let absent = dir.path().join("absent.flac");

        let candidates = vec![
            Some(present.to_string_lossy().into_owned()),
            Some(absent.to_string_lossy().into_owned()),
            None,
        ];
        let output = dir.path().join("out.m3u");
        let report = write_playlist(&candidates, &output, DEFAULT_LIMIT)?;

        assert_eq!(report.written, 1);
        assert_eq!(report.missing, vec![absent.to_string_lossy().into_owned()]);
        assert_eq!(report.unlisted, 1);

        let content = fs::read_to_string(&output)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["#EXTM3U", present.to_str().unwrap()]);
        Ok(())
    }

    #[test]
    fn test_limit_counts_missing_entries() -> Result<()> {
        let dir = TempDir::new()?;
        let mut candidates = Vec::new();
        for i in 0..4 {
            let path = dir.path().join(format!("{i}.flac"));
            fs::write(&path, b"")?;
            candidates.push(Some(path.to_string_lossy().into_owned()));
        }

        let report = write_playlist(&candidates, &dir.path().join("out.m3u"), 2)?;
        assert_eq!(report.written, 2);
        Ok(())
    }

    #[test]
    fn test_read_candidates_from_snapshot_array() -> Result<()> {
        let dir = TempDir::new()?;
        let input = dir.path().join("playcounts.json");
        fs::write(
            &input,
            r#"[{"file": "/music/a.flac", "playcount": 3}, {"title": "No file", "playcount": 1}]"#,
        )?;

        let candidates = read_candidates(&input)?;
        assert_eq!(candidates, vec![Some("/music/a.flac".to_string()), None]);
        Ok(())
    }

    #[test]
    fn test_read_candidates_rejects_scalar() -> Result<()> {
        let dir = TempDir::new()?;
        let input = dir.path().join("bogus.json");
        fs::write(&input, "42")?;
        assert!(read_candidates(&input).is_err());
        Ok(())
    }
}
