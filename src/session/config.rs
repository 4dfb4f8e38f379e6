//! Session settings.

use crate::error::ParseEnumError;
use crate::scoring::Difficulty;
use crate::timer::ROUND_SECONDS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounds in a quick-mode session.
pub const DEFAULT_QUICK_ROUNDS: u32 = 5;

/// Lives at the start of every session.
pub const DEFAULT_STARTING_LIVES: u32 = 3;

/// Game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fixed number of untimed rounds.
    #[default]
    Quick,
    /// Unbounded timed rounds; ends only when lives run out.
    Arcade,
}

impl Mode {
    /// Whether rounds in this mode have a countdown.
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(self, Self::Arcade)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Quick => "quick",
            Self::Arcade => "arcade",
        })
    }
}

impl FromStr for Mode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(Self::Quick),
            "arcade" | "timed" => Ok(Self::Arcade),
            _ => Err(ParseEnumError::new("mode", s)),
        }
    }
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Game mode.
    pub mode: Mode,
    /// Scoring and pool difficulty.
    pub difficulty: Difficulty,
    /// Round ceiling in quick mode. Ignored in arcade mode.
    pub quick_rounds: u32,
    /// Lives at session start.
    pub starting_lives: u32,
    /// Countdown per round in arcade mode.
    pub round_seconds: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Quick,
            difficulty: Difficulty::Normal,
            quick_rounds: DEFAULT_QUICK_ROUNDS,
            starting_lives: DEFAULT_STARTING_LIVES,
            round_seconds: ROUND_SECONDS,
        }
    }
}

impl SessionConfig {
    /// Default settings for `mode` at `difficulty`.
    #[must_use]
    pub fn new(mode: Mode, difficulty: Difficulty) -> Self {
        Self {
            mode,
            difficulty,
            ..Self::default()
        }
    }

    /// Round ceiling, or `None` when rounds are unbounded.
    #[must_use]
    pub const fn max_rounds(&self) -> Option<u32> {
        match self.mode {
            Mode::Quick => Some(self.quick_rounds),
            Mode::Arcade => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.mode, Mode::Quick);
        assert_eq!(config.difficulty, Difficulty::Normal);
        assert_eq!(config.max_rounds(), Some(5));
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.round_seconds, 40);
    }

    #[test]
    fn test_arcade_is_unbounded() {
        let config = SessionConfig::new(Mode::Arcade, Difficulty::Hard);
        assert_eq!(config.max_rounds(), None);
        assert!(config.mode.is_timed());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"mode":"arcade","difficulty":"easy"}"#).unwrap();
        assert_eq!(config.mode, Mode::Arcade);
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.starting_lives, 3);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Arcade".parse::<Mode>(), Ok(Mode::Arcade));
        assert!("marathon".parse::<Mode>().is_err());
    }
}
