//! The session state machine.

// Rounded distances fit comfortably in u32
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::geo::Coord;
use crate::location::{Dataset, Location};
use crate::pool::Pool;
use crate::scoring::{self, Difficulty, Verdict};
use crate::session::{Mode, RoundRecord, SessionConfig, Summary};
use crate::timer::{RoundTimer, TimerEvent};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::{debug, info};

/// Distance charged for a round that times out. Always `very_far`, and
/// beyond every difficulty's life threshold.
pub const TIMEOUT_DISTANCE_KM: f64 = 20_000.0;

/// Where the current round (or the session) stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for a guess; the timer runs in arcade mode.
    Active,
    /// A guess was locked or the round timed out.
    Resolved,
    /// The session is over.
    Finished,
}

/// Why [`Session::lock_guess`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockRejection {
    /// No guess has been placed this round.
    NoGuess,
    /// The pool is empty, so there is nothing to guess.
    NoLocation,
    /// This round is already resolved.
    AlreadyResolved,
    /// The session has finished.
    Finished,
}

impl fmt::Display for LockRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoGuess => "place a pin before locking your guess",
            Self::NoLocation => "no location available",
            Self::AlreadyResolved => "round already resolved",
            Self::Finished => "session finished",
        })
    }
}

/// Result of moving past a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A new round started.
    Next {
        /// The new round number.
        round: u32,
    },
    /// The session is over.
    Finished(Summary),
    /// Nothing happened: the round is unresolved, or the pool is empty.
    Blocked,
}

/// Result of advancing the round clock by one second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is running.
    Idle,
    /// The countdown continues.
    Running {
        /// Seconds left.
        remaining: u32,
    },
    /// The countdown ran out and resolved the round.
    TimedOut(RoundRecord),
}

/// A single play session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    dataset: Dataset,
    pool: Pool,
    rng: StdRng,

    round: u32,
    score: u32,
    lives: u32,
    streak: u32,
    history: Vec<RoundRecord>,

    guess: Option<Coord>,
    resolved: bool,
    timer: Option<RoundTimer>,
    /// Clock reading when the timer was stopped, kept for display.
    time_left: Option<u32>,
    finished: bool,
}

impl Session {
    /// Start a session whose pool order is determined by `seed`.
    #[must_use]
    pub fn new(config: SessionConfig, dataset: Dataset, seed: u64) -> Self {
        Self::with_rng(config, dataset, StdRng::seed_from_u64(seed))
    }

    /// Start a session with a pool shuffled from OS entropy.
    #[must_use]
    pub fn from_entropy(config: SessionConfig, dataset: Dataset) -> Self {
        Self::with_rng(config, dataset, StdRng::from_entropy())
    }

    fn with_rng(config: SessionConfig, dataset: Dataset, mut rng: StdRng) -> Self {
        let pool = Pool::build(&dataset, config.difficulty, &mut rng);
        let mut session = Self {
            config,
            dataset,
            pool,
            rng,
            round: 1,
            score: 0,
            lives: config.starting_lives,
            streak: 0,
            history: Vec::new(),
            guess: None,
            resolved: false,
            timer: None,
            time_left: None,
            finished: false,
        };
        session.begin_round();
        session
    }

    /// Throw away all progress and start over with a freshly shuffled pool.
    pub fn restart(&mut self) {
        self.stop_timer();
        self.pool = Pool::build(&self.dataset, self.config.difficulty, &mut self.rng);
        self.round = 1;
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.streak = 0;
        self.history.clear();
        self.finished = false;
        self.begin_round();
        debug!(mode = %self.config.mode, difficulty = %self.config.difficulty, "session restarted");
    }

    /// Change difficulty. Rebuilds the pool and restarts the session.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.config.difficulty = difficulty;
        self.restart();
    }

    /// Leave the session. Stops the timer so nothing fires afterwards.
    pub fn abandon(&mut self) {
        self.stop_timer();
        self.finished = true;
        debug!(round = self.round, "session abandoned");
    }

    // --- queries ---

    /// Session settings.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Game mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Current 1-based round number.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Round ceiling, `None` when unbounded.
    #[must_use]
    pub const fn max_rounds(&self) -> Option<u32> {
        self.config.max_rounds()
    }

    /// Cumulative score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Lives remaining.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Consecutive rounds that scored points.
    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    /// Resolved rounds so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// The session's location pool.
    #[must_use]
    pub const fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Location for the current round, `None` if the pool is empty.
    #[must_use]
    pub fn current_location(&self) -> Option<&Location> {
        self.pool.for_round(self.round)
    }

    /// The guess placed this round, if any.
    #[must_use]
    pub const fn guess(&self) -> Option<Coord> {
        self.guess
    }

    /// Seconds left in the round, `None` outside arcade mode.
    #[must_use]
    pub fn time_remaining(&self) -> Option<u32> {
        self.timer.map(|t| t.remaining()).or(self.time_left)
    }

    /// State of the current round.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.resolved {
            Phase::Resolved
        } else {
            Phase::Active
        }
    }

    /// Outcome of the current round once it has been resolved.
    #[must_use]
    pub fn last_outcome(&self) -> Option<&RoundRecord> {
        if self.resolved {
            self.history.last()
        } else {
            None
        }
    }

    /// Summary of the session as it stands.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::from_history(
            &self.history,
            self.score,
            self.lives,
            self.config.mode,
            self.config.difficulty,
        )
    }

    // --- operations ---

    /// Place or move the guess for the current round.
    ///
    /// Returns `false` if the round is not accepting guesses.
    pub fn set_guess(&mut self, coord: Coord) -> bool {
        if self.phase() != Phase::Active {
            return false;
        }
        self.guess = Some(coord);
        true
    }

    /// Lock the current guess and score the round.
    ///
    /// # Errors
    ///
    /// Returns why nothing happened if there is no guess, no location, or
    /// the round is already resolved. State is untouched in that case.
    pub fn lock_guess(&mut self) -> Result<RoundRecord, LockRejection> {
        match self.phase() {
            Phase::Finished => return Err(LockRejection::Finished),
            Phase::Resolved => return Err(LockRejection::AlreadyResolved),
            Phase::Active => {}
        }
        let (location_id, target) = self
            .current_location()
            .map(|loc| (loc.id.clone(), loc.coord()))
            .ok_or(LockRejection::NoLocation)?;
        let guess = self.guess.ok_or(LockRejection::NoGuess)?;

        self.stop_timer();
        let distance = guess.distance_to(target);
        let record = self.resolve(location_id, distance, false);
        debug!(
            round = record.round,
            distance_km = ?record.distance_km,
            points = record.points,
            verdict = %record.verdict,
            "guess locked"
        );
        Ok(record)
    }

    /// Advance the round clock by one second. Call once per elapsed second.
    ///
    /// When the clock runs out on an unresolved round, the round is
    /// resolved as a timeout.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(timer) = self.timer.as_mut() else {
            return TickOutcome::Idle;
        };
        match timer.tick() {
            Some(TimerEvent::Running { remaining }) => TickOutcome::Running { remaining },
            Some(TimerEvent::Expired) => match self.timeout() {
                Some(record) => TickOutcome::TimedOut(record),
                None => TickOutcome::Idle,
            },
            None => TickOutcome::Idle,
        }
    }

    /// Resolve the current round as timed out. Arcade mode only, at most
    /// once per round, and only while the round is unresolved.
    fn timeout(&mut self) -> Option<RoundRecord> {
        if !self.config.mode.is_timed() || self.phase() != Phase::Active {
            return None;
        }
        let location_id = self.current_location()?.id.clone();

        self.stop_timer();
        let record = self.resolve(location_id, TIMEOUT_DISTANCE_KM, true);
        debug!(round = record.round, points = record.points, "round timed out");
        Some(record)
    }

    /// Give up on the current round and move on.
    ///
    /// Always breaks the streak. An unresolved round is recorded as
    /// skipped. Then behaves like
    /// [`Session::next_round`]. Only an empty pool blocks a skip.
    pub fn skip_round(&mut self) -> Advance {
        if self.finished {
            return Advance::Finished(self.summary());
        }
        self.stop_timer();

        let Some(location_id) = self.current_location().map(|loc| loc.id.clone()) else {
            return Advance::Blocked;
        };
        self.streak = 0;
        if !self.resolved {
            self.history.push(RoundRecord::skipped(self.round, &location_id));
            self.resolved = true;
            debug!(round = self.round, location = %location_id, "round skipped");
        }

        self.advance()
    }

    /// Continue after a resolved round: finish the session or start the
    /// next round.
    ///
    /// Returns [`Advance::Blocked`] while the round is still unresolved.
    pub fn next_round(&mut self) -> Advance {
        match self.phase() {
            Phase::Finished => Advance::Finished(self.summary()),
            Phase::Active => Advance::Blocked,
            Phase::Resolved => self.advance(),
        }
    }

    // --- internals ---

    /// Apply a resolution of the round at `location_id`, `distance` km
    /// away, and append it to history.
    fn resolve(&mut self, location_id: String, distance: f64, timed_out: bool) -> RoundRecord {
        let difficulty = self.config.difficulty;
        let verdict = scoring::verdict(distance);
        let points = scoring::points(distance, difficulty);
        let life_lost = scoring::lives_delta(distance, difficulty) < 0;

        self.resolved = true;
        self.score = self.score.saturating_add(points);
        self.streak = if points > 0 && !timed_out {
            self.streak + 1
        } else {
            0
        };
        if life_lost {
            self.lives = self.lives.saturating_sub(1);
        }

        let record = RoundRecord {
            round: self.round,
            location_id,
            distance_km: Some(distance.round() as u32),
            points,
            verdict,
            life_lost,
            timeout: timed_out,
            skipped: false,
        };
        debug_assert_ne!(record.verdict, Verdict::Skipped);
        self.history.push(record.clone());
        record
    }

    /// Shared termination check for continue and skip.
    fn advance(&mut self) -> Advance {
        let out_of_lives = self.lives == 0;
        let last_round = self
            .config
            .max_rounds()
            .is_some_and(|max| self.round >= max);

        if out_of_lives || last_round {
            self.stop_timer();
            self.finished = true;
            let summary = self.summary();
            info!(
                score = summary.total_score,
                rounds = summary.rounds_played,
                lives = summary.lives_left,
                mode = %summary.mode,
                "session finished"
            );
            return Advance::Finished(summary);
        }

        self.round += 1;
        self.begin_round();
        Advance::Next { round: self.round }
    }

    /// Reset per-round state and start the clock if the mode is timed.
    fn begin_round(&mut self) {
        self.guess = None;
        self.resolved = false;
        self.time_left = None;
        self.timer = (self.config.mode.is_timed() && !self.pool.is_empty())
            .then_some(RoundTimer::start(self.config.round_seconds));
        if let Some(loc) = self.current_location() {
            debug!(round = self.round, location = %loc.id, "round started");
        }
    }

    /// Release the round timer, remembering its last reading.
    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.time_left = Some(timer.remaining());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::tests::location;

    fn two_city_dataset() -> Dataset {
        Dataset::new(vec![
            location("a", Difficulty::Easy, 10.0, 10.0),
            location("b", Difficulty::Easy, -10.0, -10.0),
        ])
        .unwrap()
    }

    fn session(mode: Mode, difficulty: Difficulty) -> Session {
        Session::new(SessionConfig::new(mode, difficulty), two_city_dataset(), 7)
    }

    fn guess_exactly(s: &mut Session) {
        let target = s.current_location().unwrap().coord();
        assert!(s.set_guess(target));
    }

    fn guess_antipode(s: &mut Session) {
        let target = s.current_location().unwrap().coord();
        let far = Coord::new(-target.lat, target.lon - 180.0_f64.copysign(target.lon));
        assert!(s.set_guess(far));
    }

    #[test]
    fn test_new_session_state() {
        let s = session(Mode::Quick, Difficulty::Normal);
        assert_eq!(s.round(), 1);
        assert_eq!(s.score(), 0);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.phase(), Phase::Active);
        assert!(s.history().is_empty());
        assert!(s.current_location().is_some());
        assert_eq!(s.time_remaining(), None);
        assert_eq!(s.max_rounds(), Some(5));
    }

    #[test]
    fn test_lock_without_guess_rejected() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        assert_eq!(s.lock_guess(), Err(LockRejection::NoGuess));
        assert_eq!(s.phase(), Phase::Active);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_perfect_guess_scores() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        guess_exactly(&mut s);
        let record = s.lock_guess().unwrap();
        assert_eq!(record.verdict, Verdict::Perfect);
        assert_eq!(record.points, 416);
        assert_eq!(record.distance_km, Some(0));
        assert!(!record.life_lost);
        assert_eq!(s.score(), 416);
        assert_eq!(s.streak(), 1);
        assert_eq!(s.lives(), 3);
        assert_eq!(s.phase(), Phase::Resolved);
        assert_eq!(s.last_outcome(), Some(&record));
    }

    #[test]
    fn test_second_lock_is_noop() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        assert_eq!(s.lock_guess(), Err(LockRejection::AlreadyResolved));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.score(), 416);
    }

    #[test]
    fn test_set_guess_rejected_after_resolution() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        assert!(!s.set_guess(Coord::new(0.0, 0.0)));
    }

    #[test]
    fn test_next_round_blocked_while_active() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        assert_eq!(s.next_round(), Advance::Blocked);
        assert_eq!(s.round(), 1);
    }

    #[test]
    fn test_next_round_resets_round_state() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        let first = s.current_location().unwrap().id.clone();
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        assert_eq!(s.next_round(), Advance::Next { round: 2 });
        assert_eq!(s.phase(), Phase::Active);
        assert_eq!(s.guess(), None);
        assert_eq!(s.last_outcome(), None);
        assert_ne!(s.current_location().unwrap().id, first);
    }

    #[test]
    fn test_far_guess_costs_life_and_resets_streak() {
        let mut s = session(Mode::Quick, Difficulty::Hard);
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        s.next_round();
        guess_antipode(&mut s);
        let record = s.lock_guess().unwrap();
        assert_eq!(record.verdict, Verdict::VeryFar);
        assert_eq!(record.points, 64);
        assert!(record.life_lost);
        assert_eq!(s.lives(), 2);
        // very_far still scores, so the streak continues
        assert_eq!(s.streak(), 2);
    }

    #[test]
    fn test_skip_records_and_advances() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        s.next_round();
        assert_eq!(s.skip_round(), Advance::Next { round: 3 });
        let last = s.history().last().unwrap();
        assert!(last.skipped);
        assert_eq!(last.round, 2);
        assert_eq!(last.verdict, Verdict::Skipped);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_skip_after_lock_does_not_duplicate_history() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        assert_eq!(s.streak(), 1);
        assert_eq!(s.skip_round(), Advance::Next { round: 2 });
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.streak(), 0);
    }

    #[test]
    fn test_quick_mode_finishes_after_five_rounds() {
        let mut s = session(Mode::Quick, Difficulty::Easy);
        for round in 1..=4 {
            assert_eq!(s.skip_round(), Advance::Next { round: round + 1 });
        }
        let Advance::Finished(summary) = s.skip_round() else {
            panic!("expected session to finish");
        };
        assert_eq!(summary.rounds_played, 5);
        assert_eq!(summary.total_score, 0);
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(s.lock_guess(), Err(LockRejection::Finished));
        assert_eq!(s.next_round(), Advance::Finished(summary));
    }

    #[test]
    fn test_arcade_timer_runs_and_times_out() {
        let mut s = session(Mode::Arcade, Difficulty::Normal);
        assert_eq!(s.time_remaining(), Some(40));
        assert_eq!(s.tick(), TickOutcome::Running { remaining: 39 });
        for _ in 0..38 {
            assert!(matches!(s.tick(), TickOutcome::Running { .. }));
        }
        let TickOutcome::TimedOut(record) = s.tick() else {
            panic!("expected timeout");
        };
        assert!(record.timeout);
        assert_eq!(record.distance_km, Some(20_000));
        assert_eq!(record.verdict, Verdict::VeryFar);
        assert!(record.life_lost);
        assert_eq!(s.lives(), 2);
        assert_eq!(s.streak(), 0);
        assert_eq!(s.tick(), TickOutcome::Idle);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_lock_stops_arcade_timer() {
        let mut s = session(Mode::Arcade, Difficulty::Normal);
        s.tick();
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        for _ in 0..100 {
            assert_eq!(s.tick(), TickOutcome::Idle);
        }
        assert_eq!(s.history().len(), 1);
        assert!(!s.history()[0].timeout);
        assert_eq!(s.time_remaining(), Some(39));
    }

    #[test]
    fn test_arcade_timer_restarts_each_round() {
        let mut s = session(Mode::Arcade, Difficulty::Normal);
        for _ in 0..10 {
            s.tick();
        }
        s.skip_round();
        assert_eq!(s.time_remaining(), Some(40));
    }

    #[test]
    fn test_quick_mode_has_no_timer() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        assert_eq!(s.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_empty_pool_is_inert() {
        let dataset = Dataset::new(Vec::new()).unwrap();
        let mut s = Session::new(SessionConfig::new(Mode::Arcade, Difficulty::Normal), dataset, 1);
        assert!(s.current_location().is_none());
        assert!(s.set_guess(Coord::new(0.0, 0.0)));
        assert_eq!(s.lock_guess(), Err(LockRejection::NoLocation));
        assert_eq!(s.tick(), TickOutcome::Idle);
        assert_eq!(s.skip_round(), Advance::Blocked);
        assert_eq!(s.round(), 1);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_abandon_stops_timer() {
        let mut s = session(Mode::Arcade, Difficulty::Normal);
        s.abandon();
        assert_eq!(s.phase(), Phase::Finished);
        for _ in 0..50 {
            assert_eq!(s.tick(), TickOutcome::Idle);
        }
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut s = session(Mode::Quick, Difficulty::Normal);
        guess_exactly(&mut s);
        s.lock_guess().unwrap();
        s.next_round();
        s.restart();
        assert_eq!(s.round(), 1);
        assert_eq!(s.score(), 0);
        assert_eq!(s.lives(), 3);
        assert!(s.history().is_empty());
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn test_set_difficulty_rebuilds_pool() {
        let dataset = Dataset::builtin().unwrap();
        let mut s = Session::new(SessionConfig::default(), dataset, 5);
        s.set_difficulty(Difficulty::Easy);
        assert_eq!(s.difficulty(), Difficulty::Easy);
        assert_eq!(s.pool().len(), 3);
        assert!(s.pool().iter().all(|loc| loc.difficulty == Difficulty::Easy));
    }

    #[test]
    fn test_records_carry_the_round_location() {
        let mut s = session(Mode::Arcade, Difficulty::Normal);

        let first = s.current_location().unwrap().id.clone();
        guess_exactly(&mut s);
        assert_eq!(s.lock_guess().unwrap().location_id, first);
        s.next_round();

        let second = s.current_location().unwrap().id.clone();
        assert_ne!(first, second);
        let timed_out = (0..40).find_map(|_| match s.tick() {
            TickOutcome::TimedOut(record) => Some(record),
            _ => None,
        });
        assert_eq!(timed_out.unwrap().location_id, second);
        assert!(s.history().iter().all(|r| !r.location_id.is_empty()));
    }
}
