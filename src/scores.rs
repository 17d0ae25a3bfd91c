//! Per-level score book
//!
//! Kept in memory for the session. Serializable so a front end can persist it.

use serde::{Deserialize, Serialize};

/// Best result on one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelScore {
    pub level: String,
    /// Best score banked on a win
    pub best: u64,
    /// Times the level has been cleared
    pub clears: u32,
}

/// Best scores, one entry per cleared level in first-clear order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBook {
    pub entries: Vec<LevelScore>,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a cleared level. Returns true if this is a new best.
    pub fn bank(&mut self, level: &str, score: u64) -> bool {
        match self.entries.iter_mut().find(|e| e.level == level) {
            Some(entry) => {
                entry.clears += 1;
                if score > entry.best {
                    entry.best = score;
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.push(LevelScore {
                    level: level.to_string(),
                    best: score,
                    clears: 1,
                });
                true
            }
        }
    }

    pub fn best(&self, level: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.level == level).map(|e| e.best)
    }

    pub fn clears(&self, level: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.level == level)
            .map(|e| e.clears)
            .unwrap_or(0)
    }

    /// Sum of best scores across all cleared levels
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.best).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
