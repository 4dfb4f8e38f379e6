//! Cumulative statistics across finished sessions.

// Averages are display values
#![allow(clippy::cast_precision_loss)]

use crate::session::Summary;
use serde::{Deserialize, Serialize};

/// Running totals over every registered session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// Sessions registered.
    pub games_played: u64,
    /// Highest session score seen.
    pub best_score: u32,
    /// Sum of resolved distances over all sessions.
    pub total_distance_km: u64,
    /// Rounds resolved by a guess or timeout over all sessions.
    pub total_guesses: u64,
}

impl Stats {
    /// Empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished session into the totals.
    pub fn register(&mut self, summary: &Summary) {
        self.games_played += 1;
        self.best_score = self.best_score.max(summary.total_score);
        self.total_distance_km += summary.total_distance_km;
        self.total_guesses += u64::from(summary.guesses);
    }

    /// Combine totals gathered separately.
    pub fn merge(&mut self, other: &Stats) {
        self.games_played += other.games_played;
        self.best_score = self.best_score.max(other.best_score);
        self.total_distance_km += other.total_distance_km;
        self.total_guesses += other.total_guesses;
    }

    /// Mean distance per resolved guess, `None` before any guess.
    #[must_use]
    pub fn average_distance_km(&self) -> Option<f64> {
        if self.total_guesses == 0 {
            return None;
        }
        Some(self.total_distance_km as f64 / self.total_guesses as f64)
    }
}
