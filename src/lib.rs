// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Pinpoint: a round-based location-guessing game engine.
//!
//! The player sees a place, drops a pin where they think it is, and is
//! scored by great-circle distance. This crate provides:
//! - Pure distance and scoring functions
//! - Difficulty-filtered, shuffled location pools
//! - The session state machine (rounds, lives, streaks, timed rounds)
//! - Scripted guessers for batch simulation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Front end (TUI) / Autoplay        │
//! ├─────────────────────────────────────┤
//! │   Session engine  +  Round timer    │
//! ├─────────────────────────────────────┤
//! │   Scoring  │  Pool  │  Geo          │
//! ├─────────────────────────────────────┤
//! │   Location dataset (static)         │
//! └─────────────────────────────────────┘
//! ```

pub mod autoplay;
pub mod error;
pub mod geo;
pub mod location;
pub mod pool;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod timer;

pub use error::{DatasetError, ParseEnumError};
pub use geo::{distance_km, Coord};
pub use location::{Dataset, Locale, Location};
pub use pool::Pool;
pub use scoring::{Difficulty, Verdict};
pub use session::{Advance, Mode, Phase, RoundRecord, Session, SessionConfig, Summary};
pub use stats::Stats;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_compose() {
        let dataset = Dataset::builtin().unwrap();
        let mut session = Session::new(SessionConfig::default(), dataset, 0);
        let target = session.current_location().unwrap().coord();
        assert!(session.set_guess(target));
        let record = session.lock_guess().unwrap();
        assert_eq!(record.verdict, Verdict::Perfect);
        assert!(distance_km(target, target).abs() < 1e-9);
    }
}
