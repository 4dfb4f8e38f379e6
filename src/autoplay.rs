//! Scripted play: guessers that stand in for a human, and a batch runner.
//!
//! Provides a pure function interface: `(config, dataset, guesser, seed) -> Summary`.
//! Batches run sessions in parallel with rayon and fold the summaries
//! into [`Stats`].

// Seeds and counters are plain integer bookkeeping
#![allow(clippy::cast_precision_loss)]

use crate::geo::{self, Coord};
use crate::location::{Dataset, Location};
use crate::session::{Advance, Session, SessionConfig, Summary, TickOutcome};
use crate::stats::Stats;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Rounds after which a scripted session is abandoned. Arcade sessions
/// with an accurate guesser would otherwise never end.
pub const ROUND_LIMIT: u32 = 500;

/// Something that places pins.
pub trait Guesser {
    /// Pick a guess for `location`, or `None` to give up on the round.
    fn guess(&mut self, location: &Location) -> Option<Coord>;
}

/// Guesses near the true position, off by up to `max_error_km` in a
/// random direction.
#[derive(Debug)]
pub struct NoisyGuesser {
    max_error_km: f64,
    rng: StdRng,
}

impl NoisyGuesser {
    /// Create a guesser with the given error bound and seed.
    #[must_use]
    pub fn new(max_error_km: f64, seed: u64) -> Self {
        Self {
            max_error_km: max_error_km.max(0.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Guesser for NoisyGuesser {
    fn guess(&mut self, location: &Location) -> Option<Coord> {
        let bearing = self.rng.gen_range(0.0..360.0);
        let error = self.rng.gen_range(0.0..=self.max_error_km);
        Some(geo::destination(location.coord(), bearing, error))
    }
}

/// Guesses a uniformly random point on the globe.
#[derive(Debug)]
pub struct RandomGuesser {
    rng: StdRng,
}

impl RandomGuesser {
    /// Create a random guesser from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Guesser for RandomGuesser {
    fn guess(&mut self, _location: &Location) -> Option<Coord> {
        // Uniform over the sphere, not over the lat/lon rectangle
        let z: f64 = self.rng.gen_range(-1.0..=1.0);
        let lon = self.rng.gen_range(-180.0..=180.0);
        Some(Coord::new(z.asin().to_degrees(), lon))
    }
}

/// Never guesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipGuesser;

impl Guesser for SkipGuesser {
    fn guess(&mut self, _location: &Location) -> Option<Coord> {
        None
    }
}

/// Which guesser a batch uses. Each session gets its own seeded instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuesserKind {
    /// [`NoisyGuesser`] with this error bound in km.
    Noisy {
        /// Maximum error in kilometers.
        max_error_km: f64,
    },
    /// [`RandomGuesser`].
    Random,
    /// [`SkipGuesser`].
    Skip,
}

impl GuesserKind {
    /// Instantiate the guesser for one session.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn Guesser> {
        match self {
            Self::Noisy { max_error_km } => Box::new(NoisyGuesser::new(max_error_km, seed)),
            Self::Random => Box::new(RandomGuesser::new(seed)),
            Self::Skip => Box::new(SkipGuesser),
        }
    }
}

/// Play one session to the end with `guesser`.
///
/// In timed mode a guesser that gives up lets the clock run out instead
/// of skipping. Sessions that reach [`ROUND_LIMIT`], have a guess
/// rejected, or cannot progress because the pool is empty, are abandoned
/// and summarized as they stand.
pub fn play_session(
    config: SessionConfig,
    dataset: &Dataset,
    guesser: &mut dyn Guesser,
    seed: u64,
) -> Summary {
    let mut session = Session::new(config, dataset.clone(), seed);

    loop {
        if session.round() > ROUND_LIMIT {
            debug!(seed, "autoplay hit round limit");
            session.abandon();
            return session.summary();
        }
        let Some(location) = session.current_location().cloned() else {
            session.abandon();
            return session.summary();
        };

        let advance = match guesser.guess(&location) {
            Some(coord) => {
                session.set_guess(coord);
                match session.lock_guess() {
                    Ok(_) => session.next_round(),
                    Err(reason) => {
                        debug!(seed, round = session.round(), %reason, "autoplay guess rejected");
                        Advance::Blocked
                    }
                }
            }
            None if session.mode().is_timed() => {
                while let TickOutcome::Running { .. } = session.tick() {}
                session.next_round()
            }
            None => session.skip_round(),
        };

        match advance {
            Advance::Next { .. } => {}
            Advance::Finished(summary) => return summary,
            Advance::Blocked => {
                session.abandon();
                return session.summary();
            }
        }
    }
}

/// Aggregate result of a batch of scripted sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Cumulative statistics over the batch.
    pub stats: Stats,
    /// Sum of final scores.
    pub total_score: u64,
    /// Sum of rounds played.
    pub total_rounds: u64,
    /// Sessions that ended with no lives left.
    pub wiped_out: u64,
}

impl BatchReport {
    fn add(&mut self, summary: &Summary) {
        self.stats.register(summary);
        self.total_score += u64::from(summary.total_score);
        self.total_rounds += u64::from(summary.rounds_played);
        if summary.lives_left == 0 {
            self.wiped_out += 1;
        }
    }

    fn merge(mut self, other: &BatchReport) -> Self {
        self.stats.merge(&other.stats);
        self.total_score += other.total_score;
        self.total_rounds += other.total_rounds;
        self.wiped_out += other.wiped_out;
        self
    }

    /// Mean final score per session.
    #[must_use]
    pub fn avg_score(&self) -> f64 {
        if self.stats.games_played == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.stats.games_played as f64
    }

    /// Mean rounds per session.
    #[must_use]
    pub fn avg_rounds(&self) -> f64 {
        if self.stats.games_played == 0 {
            return 0.0;
        }
        self.total_rounds as f64 / self.stats.games_played as f64
    }
}

/// Play `games` sessions in parallel. Session `i` uses seed `base_seed + i`
/// for both its pool and its guesser, so a batch is reproducible.
#[must_use]
pub fn run_batch(
    config: SessionConfig,
    dataset: &Dataset,
    kind: GuesserKind,
    games: u64,
    base_seed: u64,
) -> BatchReport {
    (0..games)
        .into_par_iter()
        .fold(BatchReport::default, |mut report, i| {
            let seed = base_seed.wrapping_add(i);
            let mut guesser = kind.build(seed);
            let summary = play_session(config, dataset, guesser.as_mut(), seed);
            report.add(&summary);
            report
        })
        .reduce(BatchReport::default, |a, b| a.merge(&b))
}
