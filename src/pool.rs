//! Session pool: the difficulty-filtered, shuffled working set of locations.
//!
//! A pool is built once per session (or difficulty change) and is fixed
//! afterwards. Rounds index into it cyclically.

use crate::location::{Dataset, Location};
use crate::scoring::Difficulty;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::warn;

/// Location tiers eligible for a session at `difficulty`.
#[must_use]
pub const fn eligible_tiers(difficulty: Difficulty) -> &'static [Difficulty] {
    match difficulty {
        Difficulty::Easy => &[Difficulty::Easy],
        Difficulty::Normal => &[Difficulty::Easy, Difficulty::Normal],
        Difficulty::Hard => &[Difficulty::Normal, Difficulty::Hard],
    }
}

/// Ordered, immutable sequence of locations for one session.
#[derive(Debug, Clone)]
pub struct Pool {
    dataset: Dataset,
    /// Indices into `dataset`, in play order.
    order: Vec<usize>,
    fell_back: bool,
}

impl Pool {
    /// Filter `dataset` to the tiers for `difficulty` and shuffle the result.
    ///
    /// If no location matches, the whole dataset is used instead so the
    /// session stays playable.
    pub fn build<R: Rng + ?Sized>(dataset: &Dataset, difficulty: Difficulty, rng: &mut R) -> Self {
        let tiers = eligible_tiers(difficulty);
        let mut order: Vec<usize> = dataset
            .as_slice()
            .iter()
            .enumerate()
            .filter(|(_, loc)| tiers.contains(&loc.difficulty))
            .map(|(i, _)| i)
            .collect();

        let fell_back = order.is_empty() && !dataset.is_empty();
        if fell_back {
            warn!(%difficulty, "no locations match difficulty, using full dataset");
            order = (0..dataset.len()).collect();
        }
        if order.is_empty() {
            warn!("location dataset is empty, session cannot be played");
        }

        order.shuffle(rng);

        Self {
            dataset: dataset.clone(),
            order,
            fell_back,
        }
    }

    /// Number of locations in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the pool has no locations (misconfigured dataset).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the difficulty filter matched nothing and the full dataset was used.
    #[must_use]
    pub const fn fell_back(&self) -> bool {
        self.fell_back
    }

    /// Location for 1-based `round`, cycling once the pool is exhausted.
    #[must_use]
    pub fn for_round(&self, round: u32) -> Option<&Location> {
        if self.order.is_empty() || round == 0 {
            return None;
        }
        let index = (round as usize - 1) % self.order.len();
        self.dataset.get(self.order[index])
    }

    /// Locations in play order.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.order.iter().filter_map(|&i| self.dataset.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::tests::location;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mixed_dataset() -> Dataset {
        Dataset::new(vec![
            location("e1", Difficulty::Easy, 10.0, 10.0),
            location("e2", Difficulty::Easy, 11.0, 11.0),
            location("n1", Difficulty::Normal, 20.0, 20.0),
            location("n2", Difficulty::Normal, 21.0, 21.0),
            location("h1", Difficulty::Hard, 30.0, 30.0),
        ])
        .unwrap()
    }

    fn ids(pool: &Pool) -> Vec<String> {
        let mut ids: Vec<String> = pool.iter().map(|l| l.id.clone()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_easy_pool_only_easy() {
        let pool = Pool::build(&mixed_dataset(), Difficulty::Easy, &mut StdRng::seed_from_u64(1));
        assert_eq!(ids(&pool), vec!["e1", "e2"]);
        assert!(!pool.fell_back());
    }

    #[test]
    fn test_normal_pool_easy_and_normal() {
        let pool = Pool::build(&mixed_dataset(), Difficulty::Normal, &mut StdRng::seed_from_u64(1));
        assert_eq!(ids(&pool), vec!["e1", "e2", "n1", "n2"]);
    }

    #[test]
    fn test_hard_pool_normal_and_hard() {
        let pool = Pool::build(&mixed_dataset(), Difficulty::Hard, &mut StdRng::seed_from_u64(1));
        assert_eq!(ids(&pool), vec!["h1", "n1", "n2"]);
    }

    #[test]
    fn test_empty_filter_falls_back_to_full_dataset() {
        let dataset = Dataset::new(vec![
            location("h1", Difficulty::Hard, 0.0, 0.0),
            location("h2", Difficulty::Hard, 1.0, 1.0),
        ])
        .unwrap();
        let pool = Pool::build(&dataset, Difficulty::Easy, &mut StdRng::seed_from_u64(3));
        assert!(pool.fell_back());
        assert_eq!(ids(&pool), vec!["h1", "h2"]);
    }

    #[test]
    fn test_empty_dataset_gives_empty_pool() {
        let dataset = Dataset::new(Vec::new()).unwrap();
        let pool = Pool::build(&dataset, Difficulty::Normal, &mut StdRng::seed_from_u64(3));
        assert!(pool.is_empty());
        assert!(!pool.fell_back());
        assert!(pool.for_round(1).is_none());
    }

    #[test]
    fn test_rounds_cycle_through_pool() {
        let pool = Pool::build(&mixed_dataset(), Difficulty::Easy, &mut StdRng::seed_from_u64(9));
        let first = pool.for_round(1).unwrap().id.clone();
        let second = pool.for_round(2).unwrap().id.clone();
        assert_ne!(first, second);
        assert_eq!(pool.for_round(3).unwrap().id, first);
        assert_eq!(pool.for_round(4).unwrap().id, second);
        assert!(pool.for_round(0).is_none());
    }

    #[test]
    fn test_same_seed_same_order() {
        let dataset = Dataset::builtin().unwrap();
        let a = Pool::build(&dataset, Difficulty::Hard, &mut StdRng::seed_from_u64(42));
        let b = Pool::build(&dataset, Difficulty::Hard, &mut StdRng::seed_from_u64(42));
        let a_ids: Vec<_> = a.iter().map(|l| &l.id).collect();
        let b_ids: Vec<_> = b.iter().map(|l| &l.id).collect();
        assert_eq!(a_ids, b_ids);
    }
}
