//! Persistent top-10 high-score table.
//!
//! Scores are kept in descending order with ties resolved by insertion
//! order, capped at [`HighScoreTable::CAPACITY`] entries, and stored as a
//! JSON array on disk. A missing or corrupt file loads as an empty table;
//! persistence problems never take the game down.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// A single `(name, score)` record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Name the player entered at game over.
    pub name: String,
    /// Final score of the session.
    pub score: u32,
}

/// Ordered, capped collection of high scores.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    /// Maximum number of records the table retains.
    pub const CAPACITY: usize = 10;

    /// Loads the table from `path`, tolerating absence and corruption.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let Ok(raw) = fs::read_to_string(path) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<HighScoreEntry>>(&raw) {
            Ok(mut entries) => {
                // Re-sorting on load keeps hand-edited files consistent;
                // the stable sort preserves their relative tie order.
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(Self::CAPACITY);
                Self { entries }
            }
            Err(error) => {
                log::warn!("ignoring corrupt high-score file {}: {error}", path.display());
                Self::default()
            }
        }
    }

    /// Writes the table to `path` as a JSON array.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)
            .with_context(|| format!("writing high scores to {}", path.display()))
    }

    /// Records a score, returning `true` when it made the table.
    ///
    /// Blank names are rejected outright. Equal scores rank behind earlier
    /// entries with the same score.
    pub fn record(&mut self, name: &str, score: u32) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        let position = self
            .entries
            .iter()
            .position(|entry| entry.score < score)
            .unwrap_or(self.entries.len());
        if position >= Self::CAPACITY {
            return false;
        }

        self.entries.insert(
            position,
            HighScoreEntry {
                name: name.to_owned(),
                score,
            },
        );
        self.entries.truncate(Self::CAPACITY);
        true
    }

    /// Records in descending order, best first.
    #[must_use]
    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }
}
