//! High score leaderboards
//!
//! One table per level, tracking the 10 fastest completion times (lower is
//! better). The game talks to a [`ScoreStore`]; failures come back as `false`
//! so a broken store never blocks play.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep per level
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    /// Level completion time in seconds
    pub time: f32,
}

impl HighScoreEntry {
    /// Completion time with two decimals, e.g. `"41.90 seconds"`
    pub fn formatted_time(&self) -> String {
        format!("{:.2} seconds", self.time)
    }
}

/// Leaderboard for one level, sorted ascending by time
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a time would make the leaderboard
    pub fn qualifies(&self, time: f32) -> bool {
        if !time.is_finite() {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| time < e.time).unwrap_or(true)
    }

    /// Insert a time, evicting the slowest entry when over capacity
    ///
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify.
    /// Ties rank after existing equal times.
    pub fn add_score(&mut self, name: &str, time: f32) -> Option<usize> {
        if !self.qualifies(time) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_string(),
            time,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| time < e.time)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(pos + 1)
    }
}

/// Persistent per-level score storage used by the game
pub trait ScoreStore {
    /// Ensure a table exists for `level`
    fn create_table(&mut self, level: usize) -> bool;
    /// Record a completion time; the table keeps only the best entries
    fn add_score(&mut self, level: usize, name: &str, time: f32) -> bool;
    /// Entries ascending by time, at most [`MAX_HIGH_SCORES`]
    fn top_scores(&self, level: usize) -> Vec<HighScoreEntry>;
    /// True if fewer than the maximum entries exist or `time` beats the slowest
    fn is_new_high_score(&self, level: usize, time: f32) -> bool;
}

fn table_qualifies(tables: &BTreeMap<usize, HighScores>, level: usize, time: f32) -> bool {
    tables
        .get(&level)
        .map(|t| t.qualifies(time))
        .unwrap_or_else(|| time.is_finite())
}

/// In-memory store (tests, or sessions without persistence)
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    tables: BTreeMap<usize, HighScores>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn create_table(&mut self, level: usize) -> bool {
        self.tables.entry(level).or_default();
        true
    }

    fn add_score(&mut self, level: usize, name: &str, time: f32) -> bool {
        match self.tables.get_mut(&level) {
            Some(table) => {
                table.add_score(name, time);
                true
            }
            None => {
                log::error!("No high score table for level {}", level);
                false
            }
        }
    }

    fn top_scores(&self, level: usize) -> Vec<HighScoreEntry> {
        self.tables
            .get(&level)
            .map(|t| t.entries.clone())
            .unwrap_or_default()
    }

    fn is_new_high_score(&self, level: usize, time: f32) -> bool {
        table_qualifies(&self.tables, level, time)
    }
}

/// JSON file store
///
/// The whole file is rewritten on every change through a temporary file and
/// a rename, so a crash mid-write leaves the previous scores intact.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
    tables: BTreeMap<usize, HighScores>,
}

impl JsonScoreStore {
    /// Open (or start) a score file; unreadable contents start fresh
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tables = match Self::read(&path) {
            Ok(Some(tables)) => {
                log::info!("Loaded high scores for {} levels", tables.len());
                tables
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                BTreeMap::new()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high scores: {:#}", e);
                BTreeMap::new()
            }
        };
        Self { path, tables }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> anyhow::Result<Option<BTreeMap<usize, HighScores>>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut tables: BTreeMap<usize, HighScores> = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", path.display()))?;
        // Hand-edited files may be unsorted or oversized
        for table in tables.values_mut() {
            table.entries.retain(|e| e.time.is_finite());
            table.entries.sort_by(|a, b| a.time.total_cmp(&b.time));
            table.entries.truncate(MAX_HIGH_SCORES);
        }
        Ok(Some(tables))
    }

    fn write(&self, tables: &BTreeMap<usize, HighScores>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(tables)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    /// Apply `change` to a copy and keep it only if it reaches disk
    fn commit(&mut self, change: impl FnOnce(&mut BTreeMap<usize, HighScores>)) -> bool {
        let mut next = self.tables.clone();
        change(&mut next);
        match self.write(&next) {
            Ok(()) => {
                self.tables = next;
                true
            }
            Err(e) => {
                log::error!("High score write failed: {:#}", e);
                false
            }
        }
    }
}

impl ScoreStore for JsonScoreStore {
    fn create_table(&mut self, level: usize) -> bool {
        if self.tables.contains_key(&level) {
            return true;
        }
        self.commit(|tables| {
            tables.entry(level).or_default();
        })
    }

    fn add_score(&mut self, level: usize, name: &str, time: f32) -> bool {
        if !self.tables.contains_key(&level) {
            log::error!("No high score table for level {}", level);
            return false;
        }
        let saved = self.commit(|tables| {
            if let Some(table) = tables.get_mut(&level) {
                table.add_score(name, time);
            }
        });
        if saved {
            log::info!("High score saved: level {} {} {:.2}s", level + 1, name, time);
        }
        saved
    }

    fn top_scores(&self, level: usize) -> Vec<HighScoreEntry> {
        self.tables
            .get(&level)
            .map(|t| t.entries.clone())
            .unwrap_or_default()
    }

    fn is_new_high_score(&self, level: usize, time: f32) -> bool {
        table_qualifies(&self.tables, level, time)
    }
}
