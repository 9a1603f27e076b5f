//! High score leaderboard system
//!
//! Persisted to a JSON file, tracks top 10 scores.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceService, SaveOutcome};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Platforms landed on
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp_ms: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u32, timestamp_ms: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            timestamp_ms,
        };

        // Find insertion point (sorted descending by score)
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Read a leaderboard file; a missing file is an empty board
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading score file {}", path.display()));
            }
        };
        let mut scores: HighScores = serde_json::from_str(&json)
            .with_context(|| format!("parsing score file {}", path.display()))?;
        // Hand-edited files may be unsorted
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    /// Write the leaderboard, replacing the file atomically
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing high scores")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replacing score file {}", path.display()))?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Current Unix time in ms
pub fn unix_time_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// File-backed `PersistenceService`.
///
/// Every call re-reads the file so several processes can share it; only a
/// run that beats the stored best is written back.
#[derive(Debug, Clone)]
pub struct LocalScoreStore {
    path: PathBuf,
}

impl LocalScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current leaderboard contents
    pub fn scores(&self) -> anyhow::Result<HighScores> {
        HighScores::read(&self.path)
    }
}

impl PersistenceService for LocalScoreStore {
    fn load_best_score(&mut self) -> anyhow::Result<u32> {
        let best = self.scores()?.top_score().unwrap_or(0);
        log::info!("Loaded best score {} from {}", best, self.path.display());
        Ok(best)
    }

    fn save_if_higher(&mut self, score: u32) -> anyhow::Result<SaveOutcome> {
        let mut scores = self.scores()?;
        let best = scores.top_score().unwrap_or(0);
        if score <= best {
            return Ok(SaveOutcome::NotHigher { best });
        }
        scores.add_score(score, unix_time_ms());
        scores.write(&self.path)?;
        Ok(SaveOutcome::NewBest(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_sorted_and_capped() {
        let mut scores = HighScores::new();
        for (i, score) in [5, 1, 9, 3, 7, 2, 8, 4, 6, 10, 11].into_iter().enumerate() {
            scores.add_score(score, i as u64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(11));
        assert!(scores.entries.windows(2).all(|w| w[0].score >= w[1].score));
        // 1 was pushed off the bottom
        assert!(scores.entries.iter().all(|e| e.score != 1));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, 0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_potential_rank() {
        let mut scores = HighScores::new();
        scores.add_score(10, 0);
        scores.add_score(5, 0);
        assert_eq!(scores.potential_rank(7), Some(2));
        assert_eq!(scores.potential_rank(11), Some(1));
        assert_eq!(scores.potential_rank(1), Some(3));
    }

    #[test]
    fn test_store_missing_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = LocalScoreStore::new(dir.path().join("scores.json"));
        assert_eq!(store.load_best_score().unwrap(), 0);
    }

    #[test]
    fn test_store_saves_only_higher() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        let mut store = LocalScoreStore::new(&path);

        assert_eq!(store.save_if_higher(4).unwrap(), SaveOutcome::NewBest(4));
        assert_eq!(store.save_if_higher(2).unwrap(), SaveOutcome::NotHigher { best: 4 });
        assert_eq!(store.save_if_higher(4).unwrap(), SaveOutcome::NotHigher { best: 4 });
        assert_eq!(store.save_if_higher(6).unwrap(), SaveOutcome::NewBest(6));

        // A second store over the same file sees the same board
        let mut other = LocalScoreStore::new(&path);
        assert_eq!(other.load_best_score().unwrap(), 6);
        assert_eq!(other.scores().unwrap().entries.len(), 2);
        assert!(!dir.path().join("scores.json.tmp").exists());
    }

    #[test]
    fn test_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "][").unwrap();

        let mut store = LocalScoreStore::new(&path);
        let err = store.load_best_score().unwrap_err();
        assert!(format!("{:#}", err).contains("parsing score file"));
        assert!(store.save_if_higher(3).is_err());
    }
}
