//! High score leaderboard system
//!
//! Persisted as JSON, tracks the top 10 sessions.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::persistence;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Total bouncer hits in the session
    pub score: u64,
    /// Waves advanced
    pub waves: u32,
    /// Balls launched
    pub balls: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
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
    pub fn qualifies(&self, score: u64) -> bool {
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
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a session to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        // Sorted descending by score; ties keep the older entry first
        let pos = self.entries.iter().position(|e| entry.score > e.score);
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

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a JSON file; a missing or corrupt file starts fresh
    pub fn load(path: impl AsRef<Path>) -> Self {
        match persistence::read_json::<HighScores>(path.as_ref()) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e @ ConfigError::Io { .. }) => {
                log::info!("No high scores loaded ({}), starting fresh", e);
                Self::new()
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    /// Save high scores as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        persistence::write_json(path.as_ref(), self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            waves: 1,
            balls: 1,
            timestamp: 0,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        assert!(!HighScores::new().qualifies(0));
    }

    #[test]
    fn test_add_score_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(entry(5)), Some(1));
        assert_eq!(scores.add_score(entry(9)), Some(1));
        assert_eq!(scores.add_score(entry(7)), Some(2));
        assert_eq!(scores.add_score(entry(5)), Some(4));

        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![9, 7, 5, 5]);
        assert_eq!(scores.top_score(), Some(9));
    }

    #[test]
    fn test_full_board_truncates() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(entry(s * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);

        // Lower than the lowest entry (10)
        assert!(!scores.qualifies(5));
        assert_eq!(scores.potential_rank(5), None);
        assert_eq!(scores.add_score(entry(5)), None);

        assert_eq!(scores.potential_rank(15), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.add_score(entry(15)), Some(MAX_HIGH_SCORES));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(15));
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "infinite_bounce_highscores_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_save_and_reload() {
        let path = scratch_path("reload");
        let mut scores = HighScores::new();
        scores.add_score(HighScoreEntry {
            score: 31,
            waves: 12,
            balls: 11,
            timestamp: 1_700_000_000,
        });
        scores.add_score(entry(7));
        scores.save(&path).unwrap();

        let loaded = HighScores::load(&path);
        assert_eq!(loaded.entries, scores.entries);
        assert_eq!(loaded.top_score(), Some(31));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_or_corrupt_file_starts_fresh() {
        let missing = HighScores::load(scratch_path("missing"));
        assert!(missing.entries.is_empty());

        let path = scratch_path("corrupt");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(HighScores::load(&path).entries.is_empty());
        let _ = std::fs::remove_file(&path);
    }
}
