//! # Configuration Module
//!
//! This module handles configuration and data directory setup for Playtally.
//! It provides platform-appropriate storage for yearly snapshots and the
//! limits used when ranking songs, artists and samples.
//!
//! ## Data Storage
//!
//! Snapshots are filed by year under the platform-standard data directory:
//! - Linux: `~/.local/share/playtally/playcounts/`
//! - macOS: `~/Library/Application Support/playtally/playcounts/`
//! - Windows: `%APPDATA%\playtally\playcounts\`
//!
//! The location can be overridden with `--root` or `PLAYTALLY_ROOT`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Returns the platform-appropriate data directory for Playtally, creating it
/// if needed.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The playtally subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        ))?;

    let app_dir = data_dir.join("playtally");
    fs::create_dir_all(&app_dir)
        .with_context(|| format!(
            "Failed to create Playtally data directory at {}. Please check file permissions.",
            app_dir.display()
        ))?;

    Ok(app_dir)
}

/// Returns the default directory holding the per-year snapshot folders.
///
/// # Examples
///
/// ```no_run
/// use playtally::config::default_snapshot_root;
///
/// let root = default_snapshot_root()?;
/// println!("Snapshots live in {}", root.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn default_snapshot_root() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("playcounts"))
}

/// Sizes of the ranked and sampled lists in a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingLimits {
    pub top_songs: usize,
    pub top_artists: usize,
    /// Length of the new/removed track samples.
    pub sample_size: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            top_songs: 100,
            top_artists: 5,
            sample_size: 10,
        }
    }
}

/// Configuration for runtime behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory holding the per-year snapshot folders
    pub snapshot_root: PathBuf,
}

impl RuntimeConfig {
    /// Create a new runtime configuration
    pub fn new() -> Result<Self> {
        Ok(Self {
            snapshot_root: default_snapshot_root()?,
        })
    }

    /// Create configuration with explicit snapshot root
    pub fn with_root(snapshot_root: PathBuf) -> Self {
        Self { snapshot_root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir_creates_directory() {
        let dir = get_data_dir().expect("Should get data directory");
        assert!(dir.exists());
        assert!(dir.is_dir());
        assert_eq!(dir.file_name().unwrap(), "playtally");
    }

    #[test]
    fn test_default_snapshot_root_structure() {
        let root = default_snapshot_root().expect("Should get valid root");
        assert!(root.is_absolute(), "Snapshot root should be absolute");
        assert!(root.ends_with("playtally/playcounts"));
    }

    #[test]
    fn test_default_limits() {
        let limits = RankingLimits::default();
        assert_eq!(limits.top_songs, 100);
        assert_eq!(limits.top_artists, 5);
        assert_eq!(limits.sample_size, 10);
    }

    #[test]
    fn test_runtime_config_with_root() {
        let config = RuntimeConfig::with_root(PathBuf::from("/tmp/playcounts"));
        assert_eq!(config, RuntimeConfig { snapshot_root: PathBuf::from("/tmp/playcounts") });
    }

    #[test]
    fn test_runtime_config_new_uses_default_root() {
        let config = RuntimeConfig::new().expect("Should build config");
        assert_eq!(config.snapshot_root, default_snapshot_root().unwrap());
    }
}
