//! Round/session engine.
//!
//! A session owns everything that changes during play:
//! - Round number, score, lives and streak
//! - The in-progress guess and the round timer (arcade mode only)
//! - The history of resolved rounds
//!
//! Each round moves `Active -> Resolved` through exactly one of lock,
//! timeout or skip, then the session either starts the next round or
//! finishes with a [`Summary`].

mod config;
mod engine;
mod record;
mod summary;

pub use config::{Mode, SessionConfig, DEFAULT_QUICK_ROUNDS, DEFAULT_STARTING_LIVES};
pub use engine::{Advance, LockRejection, Phase, Session, TickOutcome, TIMEOUT_DISTANCE_KM};
pub use record::RoundRecord;
pub use summary::Summary;
