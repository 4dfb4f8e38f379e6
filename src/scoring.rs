//! Scoring policy: distance to verdict, points, and life penalty.
//!
//! All three lookups are pure. The tables are small and ordered:
//!
//! | Verdict      | Ceiling (km) | Base points |
//! |--------------|--------------|-------------|
//! | `perfect`    | 1            | 320         |
//! | `very_close` | 10           | 240         |
//! | `close`      | 100          | 170         |
//! | `far`        | 1000         | 90          |
//! | `very_far`   | -            | 40          |
//!
//! | Difficulty | Multiplier | Life lost beyond (km) |
//! |------------|------------|-----------------------|
//! | `easy`     | 1.0        | 4000                  |
//! | `normal`   | 1.3        | 2500                  |
//! | `hard`     | 1.6        | 1500                  |

// Points are small positive values, rounding to u32 is exact
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::error::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance ceilings in ascending order; anything beyond the last is `VeryFar`.
const VERDICT_CEILINGS: [(f64, Verdict); 4] = [
    (1.0, Verdict::Perfect),
    (10.0, Verdict::VeryClose),
    (100.0, Verdict::Close),
    (1000.0, Verdict::Far),
];

/// Session difficulty. Also used as the tier of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Well-known landmarks only.
    Easy,
    /// Easy and normal locations.
    #[default]
    Normal,
    /// Normal and hard locations.
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Parse a difficulty, treating anything unrecognized as `Normal`.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Self::Normal)
    }

    /// Points multiplier applied to the verdict's base points.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Normal => 1.3,
            Self::Hard => 1.6,
        }
    }

    /// A guess further than this many kilometers away costs a life.
    #[must_use]
    pub const fn life_penalty_threshold_km(self) -> f64 {
        match self {
            Self::Easy => 4000.0,
            Self::Normal => 2500.0,
            Self::Hard => 1500.0,
        }
    }

    /// Lowercase name as used in settings and summaries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseEnumError::new("difficulty", s)),
        }
    }
}

/// Qualitative closeness bucket for a resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Within 1 km.
    Perfect,
    /// Within 10 km.
    VeryClose,
    /// Within 100 km.
    Close,
    /// Within 1000 km.
    Far,
    /// Beyond 1000 km, or an unusable distance.
    VeryFar,
    /// The round was skipped without a guess. Never produced by [`verdict`].
    Skipped,
}

impl Verdict {
    /// Points before the difficulty multiplier.
    #[must_use]
    pub const fn base_points(self) -> u32 {
        match self {
            Self::Perfect => 320,
            Self::VeryClose => 240,
            Self::Close => 170,
            Self::Far => 90,
            Self::VeryFar => 40,
            Self::Skipped => 0,
        }
    }

    /// Snake-case tag, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::VeryClose => "very_close",
            Self::Close => "close",
            Self::Far => "far",
            Self::VeryFar => "very_far",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Map a distance to its verdict.
///
/// Negative and non-finite distances are treated as infinitely far.
#[must_use]
pub fn verdict(distance_km: f64) -> Verdict {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Verdict::VeryFar;
    }
    VERDICT_CEILINGS
        .iter()
        .find(|(ceiling, _)| distance_km <= *ceiling)
        .map_or(Verdict::VeryFar, |&(_, v)| v)
}

/// Points awarded for a guess `distance_km` away at `difficulty`.
#[must_use]
pub fn points(distance_km: f64, difficulty: Difficulty) -> u32 {
    let base = f64::from(verdict(distance_km).base_points());
    (base * difficulty.multiplier()).round() as u32
}

/// Change in lives for a guess: `-1` beyond the difficulty's threshold
/// or for a non-finite distance, otherwise `0`.
#[must_use]
pub fn lives_delta(distance_km: f64, difficulty: Difficulty) -> i32 {
    if !distance_km.is_finite() || distance_km > difficulty.life_penalty_threshold_km() {
        -1
    } else {
        0
    }
}
