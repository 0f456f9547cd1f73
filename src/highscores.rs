//! Run records and the high score leaderboard
//!
//! Finished runs are appended to a [`RunLog`]. The leaderboard is derived
//! from those records and keeps the top 10 scores.

use serde::{Deserialize, Serialize};

use crate::sim::{CarStyle, Mode, Session};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// What gets logged when a run ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub name: String,
    pub age: u32,
    pub avatar: String,
    pub car: CarStyle,
    pub color: String,
    #[serde(default)]
    pub mode: Mode,
    pub score: u64,
    /// Badge labels in award order
    pub badges: Vec<String>,
    /// Whole seconds survived
    pub time: u32,
    /// Unix timestamp (ms) when the run ended
    pub timestamp: f64,
}

impl RunRecord {
    pub fn from_session(session: &Session, timestamp: f64) -> Self {
        let p = &session.profile;
        Self {
            name: p.name.clone(),
            age: p.age,
            avatar: p.avatar.clone(),
            car: p.car,
            color: p.color.clone(),
            mode: session.mode,
            score: session.score,
            badges: session.badge_labels(),
            time: session.elapsed_secs(),
            timestamp,
        }
    }
}

/// Append-only sink for finished runs
pub trait RunLog {
    fn append(&mut self, record: &RunRecord) -> crate::Result<()>;
}

/// Run log kept in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRunLog {
    pub records: Vec<RunRecord>,
}

impl RunLog for MemoryRunLog {
    fn append(&mut self, record: &RunRecord) -> crate::Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// "avatar name (age)"
    pub player: String,
    pub mode: Mode,
    pub score: u64,
    /// Badge labels in award order
    pub badges: Vec<String>,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
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

    /// Build the leaderboard from logged runs
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RunRecord>) -> Self {
        let mut scores = Self::new();
        for r in records {
            scores.add(r);
        }
        scores
    }

    /// Check if a score qualifies for the leaderboard
    ///
    /// Any score fills an empty slot, zero included. A full board needs a
    /// score strictly above its lowest entry.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a run to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add(&mut self, record: &RunRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        let entry = HighScoreEntry {
            player: format!("{} {} ({})", record.avatar, record.name, record.age),
            mode: record.mode,
            score: record.score,
            badges: record.badges.clone(),
            timestamp: record.timestamp,
        };

        // Sorted descending by score; ties keep arrival order
        let pos = self.entries.iter().position(|e| record.score > e.score);
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

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// One line per entry, ready to print
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let line = format!(
                    "{:>2}. {:<28} {:<4} {:>6}",
                    i + 1,
                    e.player,
                    e.mode.as_str(),
                    e.score
                );
                if e.badges.is_empty() {
                    line
                } else {
                    format!("{line}  {}", e.badges.join(", "))
                }
            })
            .collect()
    }
}
