//! High score leaderboard
//!
//! Kept for the lifetime of the process and shown on the game over screen.
//! Tracks the top 10 scores.

use serde::{Deserialize, Serialize};

use crate::sim::Mode;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    pub mode: Mode,
    /// 1-based story stage the score was made on
    pub stage: Option<usize>,
    /// Clock time (seconds) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
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
    pub fn add_score(
        &mut self,
        score: u32,
        mode: Mode,
        stage: Option<usize>,
        timestamp: f64,
    ) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                mode,
                stage,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Leaderboard lines as shown on the game over screen
    pub fn rows(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| match e.stage {
                Some(stage) => format!(
                    "{}. {} pts - {} stage {}",
                    i + 1,
                    e.score,
                    e.mode.as_str(),
                    stage
                ),
                None => format!("{}. {} pts - {}", i + 1, e.score, e.mode.as_str()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, Mode::Free, None, 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending_with_ranks() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(10, Mode::Free, None, 1.0), Some(1));
        assert_eq!(scores.add_score(30, Mode::Story, Some(2), 2.0), Some(1));
        assert_eq!(scores.add_score(20, Mode::Free, None, 3.0), Some(2));
        // Ties rank below the existing entry
        assert_eq!(scores.add_score(20, Mode::Free, None, 4.0), Some(3));
        let order: Vec<_> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![30, 20, 20, 10]);
        assert_eq!(scores.top_score(), Some(30));
        assert_eq!(scores.rows()[0], "1. 30 pts - STORY stage 2");
        assert_eq!(scores.rows()[3], "4. 10 pts - FREE");
    }

    #[test]
    fn test_keeps_top_ten() {
        let mut scores = HighScores::new();
        for s in 1..=12 {
            scores.add_score(s, Mode::Free, None, s as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(3));
        assert!(!scores.qualifies(3));
        assert_eq!(scores.potential_rank(4), Some(10));
        assert_eq!(scores.potential_rank(100), Some(1));
    }
}
