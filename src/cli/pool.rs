//! Pool command implementation.

use super::{load_dataset, resolve_seed, CliError};
use pinpoint::pool::eligible_tiers;
use pinpoint::{Difficulty, Locale, Pool};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Execute the pool command.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(
    difficulty: Difficulty,
    seed: Option<u64>,
    locale: Locale,
    dataset: Option<PathBuf>,
) -> Result<(), CliError> {
    let dataset = load_dataset(dataset.as_deref())?;
    let seed = resolve_seed(seed);
    let pool = Pool::build(&dataset, difficulty, &mut StdRng::seed_from_u64(seed));

    let tiers: Vec<&str> = eligible_tiers(difficulty).iter().map(|t| t.as_str()).collect();
    println!("Pool for {difficulty} (seed: {seed})");
    println!("  Tiers: {}", tiers.join(", "));
    if pool.fell_back() {
        println!("  No locations match; using the full dataset");
    }
    println!("  Locations: {} of {}", pool.len(), dataset.len());
    println!();

    for (i, loc) in pool.iter().enumerate() {
        println!(
            "  {:>3}. {:<28} {:<6} {:>9.4} {:>10.4}  {}",
            i + 1,
            loc.id,
            loc.difficulty,
            loc.lat,
            loc.lon,
            loc.name.get(locale)
        );
    }

    Ok(())
}
