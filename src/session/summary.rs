//! End-of-session summary.

// Distances are whole kilometers well inside u32
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]

use crate::scoring::Difficulty;
use crate::session::{Mode, RoundRecord};
use serde::{Deserialize, Serialize};

/// Aggregate produced when a session finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Final score.
    pub total_score: u32,
    /// Rounds in history, skipped ones included.
    pub rounds_played: u32,
    /// Smallest resolved distance, ignoring skips.
    pub best_distance_km: Option<u32>,
    /// Mean resolved distance rounded to whole kilometers.
    pub avg_distance_km: Option<u32>,
    /// Sum of resolved distances.
    pub total_distance_km: u64,
    /// Rounds resolved by a guess or timeout.
    pub guesses: u32,
    /// Lives left at the end.
    pub lives_left: u32,
    /// Mode the session was played in.
    pub mode: Mode,
    /// Difficulty the session was played at.
    pub difficulty: Difficulty,
}

impl Summary {
    /// Summarize a finished session's history.
    #[must_use]
    pub fn from_history(
        history: &[RoundRecord],
        total_score: u32,
        lives_left: u32,
        mode: Mode,
        difficulty: Difficulty,
    ) -> Self {
        let distances: Vec<u32> = history.iter().filter_map(|r| r.distance_km).collect();
        let total_distance_km: u64 = distances.iter().map(|&d| u64::from(d)).sum();
        let best_distance_km = distances.iter().copied().min();
        let avg_distance_km = if distances.is_empty() {
            None
        } else {
            Some((total_distance_km as f64 / distances.len() as f64).round() as u32)
        };

        Self {
            total_score,
            rounds_played: history.len() as u32,
            best_distance_km,
            avg_distance_km,
            total_distance_km,
            guesses: distances.len() as u32,
            lives_left,
            mode,
            difficulty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Verdict;

    fn guessed(round: u32, distance_km: u32) -> RoundRecord {
        RoundRecord {
            round,
            location_id: format!("loc{round}"),
            distance_km: Some(distance_km),
            points: 10,
            verdict: Verdict::Far,
            life_lost: false,
            timeout: false,
            skipped: false,
        }
    }

    #[test]
    fn test_summary_ignores_skips() {
        let history = vec![
            guessed(1, 100),
            RoundRecord::skipped(2, "loc2"),
            guessed(3, 301),
        ];
        let summary = Summary::from_history(&history, 500, 2, Mode::Quick, Difficulty::Easy);
        assert_eq!(summary.rounds_played, 3);
        assert_eq!(summary.guesses, 2);
        assert_eq!(summary.best_distance_km, Some(100));
        // (100 + 301) / 2 = 200.5 rounds up
        assert_eq!(summary.avg_distance_km, Some(201));
        assert_eq!(summary.total_distance_km, 401);
        assert_eq!(summary.lives_left, 2);
    }

    #[test]
    fn test_summary_all_skipped() {
        let history = vec![RoundRecord::skipped(1, "a")];
        let summary = Summary::from_history(&history, 0, 3, Mode::Arcade, Difficulty::Hard);
        assert_eq!(summary.best_distance_km, None);
        assert_eq!(summary.avg_distance_km, None);
        assert_eq!(summary.guesses, 0);
    }
}
