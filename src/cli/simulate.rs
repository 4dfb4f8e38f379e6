//! Simulate command implementation.

use super::output::{format_simulate_text, JsonSimulateResult};
use super::{load_dataset, resolve_seed, CliError, GuesserArg, SimulateFormat};
use indicatif::{ProgressBar, ProgressStyle};
use pinpoint::autoplay::{run_batch, GuesserKind};
use pinpoint::{Difficulty, Mode, SessionConfig};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or output fails.
#[allow(clippy::too_many_arguments, clippy::needless_pass_by_value)]
pub(crate) fn execute(
    games: u64,
    seed: Option<u64>,
    mode: Mode,
    difficulty: Difficulty,
    guesser: GuesserArg,
    error_km: f64,
    threads: Option<usize>,
    dataset: Option<PathBuf>,
    format: SimulateFormat,
    progress: bool,
) -> Result<(), CliError> {
    let dataset = load_dataset(dataset.as_deref())?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let base_seed = resolve_seed(seed);
    let config = SessionConfig::new(mode, difficulty);
    let (kind, guesser_name) = match guesser {
        GuesserArg::Noisy => (GuesserKind::Noisy { max_error_km: error_km }, "noisy"),
        GuesserArg::Random => (GuesserKind::Random, "random"),
        GuesserArg::Skip => (GuesserKind::Skip, "skip"),
    };

    let pb = if progress {
        let pb = ProgressBar::new(games);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sessions")
            .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
            .progress_chars("=>-");
        pb.set_style(style);
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let report = run_batch(config, &dataset, kind, games, base_seed);

    // Update progress bar after completion (no atomic overhead in hot path)
    if let Some(pb) = pb {
        pb.set_position(report.stats.games_played);
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    match format {
        SimulateFormat::Text => {
            println!();
            print!("{}", format_simulate_text(&report, mode, difficulty, guesser_name));
            println!();
            println!("Seed: {base_seed}  Duration: {:.2}s", duration.as_secs_f64());
        }
        SimulateFormat::Json => {
            let json_result =
                JsonSimulateResult::from_report(&report, base_seed, mode, difficulty, guesser_name);
            let json = serde_json::to_string_pretty(&json_result)
                .map_err(|e| CliError::new(format!("JSON serialization failed: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
