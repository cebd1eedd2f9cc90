//! High-score lists, best records and scoreboard statistics, persisted per mode key.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};

use crate::StoreError;
use crate::store::{self, KeyValueStore};

/// Top-K size of every leaderboard.
pub const LEADERBOARD_CAPACITY: usize = 10;

pub fn leaderboard_key(mode_key: &str) -> String {
    format!("chromatch:leaderboard:{}", mode_key)
}

pub fn best_score_key(mode_key: &str) -> String {
    format!("chromatch:best-score:{}", mode_key)
}

pub fn best_time_key(mode_key: &str) -> String {
    format!("chromatch:best-time:{}", mode_key)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u32,
    /// Time taken, for games played against the clock upwards.
    pub elapsed_secs: Option<u32>,
    pub mode: String,
    /// Seconds since the unix epoch, supplied by the host.
    pub timestamp: u64,
}

impl LeaderboardEntry {
    /// Leaderboard order: higher score first, then faster time, then most recent.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| match (self.elapsed_secs, other.elapsed_secs) {
                (Some(mine), Some(theirs)) => mine.cmp(&theirs),
                _ => Ordering::Equal,
            })
            .then_with(|| other.timestamp.cmp(&self.timestamp))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    mode_key: String,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(mode_key: &str) -> Self {
        Self {
            mode_key: mode_key.into(),
            entries: Vec::new(),
        }
    }

    /// Loads the list for `mode_key`, an absent or unreadable list loads as empty.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, mode_key: &str) -> Self {
        let mut entries: Vec<LeaderboardEntry> =
            store::load_json(store, &leaderboard_key(mode_key)).unwrap_or_default();
        entries.sort_by(LeaderboardEntry::rank_cmp);
        entries.truncate(LEADERBOARD_CAPACITY);
        Self {
            mode_key: mode_key.into(),
            entries,
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store::save_json(store, &leaderboard_key(&self.mode_key), &self.entries)
    }

    pub fn reset<S: KeyValueStore + ?Sized>(
        store: &mut S,
        mode_key: &str,
    ) -> Result<(), StoreError> {
        log::debug!("Resetting leaderboard {}", mode_key);
        store.remove(&leaderboard_key(mode_key))
    }

    pub fn mode_key(&self) -> &str {
        &self.mode_key
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `score` would make it onto the list.
    pub fn qualifies(&self, score: u32) -> bool {
        match self.entries.get(LEADERBOARD_CAPACITY - 1) {
            Some(last) if self.entries.len() >= LEADERBOARD_CAPACITY => score > last.score,
            _ => true,
        }
    }

    /// Inserts `entry` in rank order and drops whatever falls off the end.
    ///
    /// Returns the zero-based rank, or `None` if the entry did not survive the cut.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .position(|existing| entry.rank_cmp(existing) == Ordering::Less)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry);
        self.entries.truncate(LEADERBOARD_CAPACITY);
        (position < LEADERBOARD_CAPACITY).then_some(position)
    }
}

/// Whether an offered result improved a [`BestRecord`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Improvement {
    pub score: bool,
    pub time: bool,
}

impl Improvement {
    pub const fn any(self) -> bool {
        self.score || self.time
    }
}

/// Best score and best time of a mode, zero meaning unset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRecord {
    pub score: u32,
    pub time_secs: u32,
}

impl BestRecord {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, mode_key: &str) -> Self {
        Self {
            score: store::load_json(store, &best_score_key(mode_key)).unwrap_or(0),
            time_secs: store::load_json(store, &best_time_key(mode_key)).unwrap_or(0),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        mode_key: &str,
    ) -> Result<(), StoreError> {
        store::save_json(store, &best_score_key(mode_key), &self.score)?;
        store::save_json(store, &best_time_key(mode_key), &self.time_secs)
    }

    /// Takes the score if unset or higher, and the time if unset or lower.
    pub fn offer(&mut self, score: u32, time_secs: Option<u32>) -> Improvement {
        let mut improvement = Improvement::default();
        if self.score == 0 || score > self.score {
            self.score = score;
            improvement.score = true;
        }
        if let Some(time_secs) = time_secs {
            if self.time_secs == 0 || time_secs < self.time_secs {
                self.time_secs = time_secs;
                improvement.time = true;
            }
        }
        improvement
    }
}

/// Aggregate view over the best scores of several modes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreboardStats {
    pub total_score: u32,
    pub modes_played: usize,
    pub average_score: u32,
    /// Mode key and score of the highest best score.
    pub best: Option<(String, u32)>,
}

impl ScoreboardStats {
    pub fn collect<S: KeyValueStore + ?Sized>(store: &S, mode_keys: &[&str]) -> Self {
        let mut stats = Self::default();
        for &mode_key in mode_keys {
            let score = BestRecord::load(store, mode_key).score;
            if score == 0 {
                continue;
            }

            stats.total_score = stats.total_score.saturating_add(score);
            stats.modes_played += 1;
            if stats.best.as_ref().is_none_or(|(_, best)| score > *best) {
                stats.best = Some((mode_key.into(), score));
            }
        }

        if stats.modes_played > 0 {
            stats.average_score = stats.total_score / stats.modes_played as u32;
        }
        stats
    }
}
