//! High score persistence
//!
//! The game core only hands out a final score when a session ends. This
//! module compares it against the stored best and overwrites it when beaten.
//! Scores are kept as a small JSON document next to a version tag.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file name for the high score record
pub const DEFAULT_HIGH_SCORE_FILE: &str = ".power_snake_high.json";

/// Anything that can remember the best score across runs
pub trait HighScoreStore {
    /// Best score recorded so far, 0 if none
    fn load(&self) -> Result<u32>;

    /// Store `score` if it beats the current best.
    ///
    /// Returns true when a new high score was written.
    fn record(&mut self, score: u32) -> Result<bool>;
}

/// On-disk representation of the high score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u32,
    /// Version identifier of the game that wrote the record
    pub version: String,
}

impl HighScoreRecord {
    pub fn new(high_score: u32) -> Self {
        Self {
            high_score,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// High score kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonHighScoreStore {
    path: PathBuf,
}

impl JsonHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonHighScoreStore {
    fn load(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let record: HighScoreRecord =
            serde_json::from_str(&json).context("Failed to deserialize high score")?;

        Ok(record.high_score)
    }

    fn record(&mut self, score: u32) -> Result<bool> {
        let previous = self.load()?;
        if score <= previous {
            return Ok(false);
        }

        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(&HighScoreRecord::new(score))
            .context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        tracing::info!(score, previous, "new high score saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_zero() {
        let dir = TempDir::new().unwrap();
        let store = JsonHighScoreStore::new(dir.path().join("high.json"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_record_only_when_beaten() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonHighScoreStore::new(dir.path().join("nested/dir/high.json"));

        assert!(store.record(12).unwrap());
        assert_eq!(store.load().unwrap(), 12);

        assert!(!store.record(12).unwrap());
        assert!(!store.record(3).unwrap());
        assert_eq!(store.load().unwrap(), 12);

        assert!(store.record(13).unwrap());
        assert_eq!(store.load().unwrap(), 13);
    }

    #[test]
    fn test_record_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("high.json");
        let mut store = JsonHighScoreStore::new(&path);
        store.record(7).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let record: HighScoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, HighScoreRecord::new(7));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("high.json");
        std::fs::write(&path, "{ nope").unwrap();

        let store = JsonHighScoreStore::new(&path);
        assert!(store.load().is_err());
    }
}
