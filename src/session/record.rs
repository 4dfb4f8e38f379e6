//! History entries for resolved rounds.

use crate::scoring::Verdict;
use serde::{Deserialize, Serialize};

/// Outcome of one resolved round. Computed once and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number.
    pub round: u32,
    /// Id of the location the round was played at.
    pub location_id: String,
    /// Distance rounded to whole kilometers; `None` for a skipped round.
    pub distance_km: Option<u32>,
    /// Points awarded.
    pub points: u32,
    /// Closeness verdict, or `Skipped`.
    pub verdict: Verdict,
    /// Whether the round cost a life.
    pub life_lost: bool,
    /// Whether the countdown ran out before a guess was locked.
    pub timeout: bool,
    /// Whether the round was skipped without a guess.
    pub skipped: bool,
}

impl RoundRecord {
    /// Record for a round skipped without a guess.
    #[must_use]
    pub fn skipped(round: u32, location_id: &str) -> Self {
        Self {
            round,
            location_id: location_id.to_string(),
            distance_km: None,
            points: 0,
            verdict: Verdict::Skipped,
            life_lost: false,
            timeout: false,
            skipped: true,
        }
    }

    /// Whether this round was resolved by a guess or a timeout.
    #[must_use]
    pub const fn is_resolved_guess(&self) -> bool {
        !self.skipped && self.distance_km.is_some()
    }
}
