//! Per-round countdown for timed sessions.
//!
//! The timer has no clock of its own: the owner calls [`RoundTimer::tick`]
//! once per elapsed second. A session keeps the timer in an `Option` and
//! drops it when the round is resolved, so a stopped timer cannot fire.

/// Seconds allowed per round in arcade mode.
pub const ROUND_SECONDS: u32 = 40;

/// Result of advancing a timer by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Time remains on the clock.
    Running {
        /// Seconds left after this tick.
        remaining: u32,
    },
    /// The countdown reached zero on this tick. Reported exactly once.
    Expired,
}

/// A countdown scoped to a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTimer {
    remaining: u32,
    fired: bool,
}

impl RoundTimer {
    /// Start a countdown of `seconds`.
    #[must_use]
    pub const fn start(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            fired: false,
        }
    }

    /// Seconds left on the clock.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the countdown has already expired.
    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }

    /// Advance by one second.
    ///
    /// Returns `None` once the timer has fired; expiry is never reported twice.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.fired {
            return None;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.fired = true;
            return Some(TimerEvent::Expired);
        }
        self.remaining -= 1;
        Some(TimerEvent::Running {
            remaining: self.remaining,
        })
    }
}
