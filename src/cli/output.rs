//! Output formatting utilities for CLI.

use pinpoint::autoplay::BatchReport;
use pinpoint::{Difficulty, Mode, Summary};
use serde::Serialize;

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSimulateResult {
    /// First seed of the batch.
    pub(super) seed: u64,
    /// Game mode.
    pub(super) mode: Mode,
    /// Difficulty.
    pub(super) difficulty: Difficulty,
    /// Guesser name.
    pub(super) guesser: String,
    /// Raw totals.
    pub(super) report: BatchReport,
    /// Mean final score.
    pub(super) avg_score: f64,
    /// Mean rounds per session.
    pub(super) avg_rounds: f64,
    /// Mean distance per resolved guess (null if none).
    pub(super) avg_distance_km: Option<f64>,
}

impl JsonSimulateResult {
    /// Create from a batch report.
    pub(super) fn from_report(
        report: &BatchReport,
        seed: u64,
        mode: Mode,
        difficulty: Difficulty,
        guesser: &str,
    ) -> Self {
        Self {
            seed,
            mode,
            difficulty,
            guesser: guesser.to_string(),
            report: *report,
            avg_score: report.avg_score(),
            avg_rounds: report.avg_rounds(),
            avg_distance_km: report.stats.average_distance_km(),
        }
    }
}

/// Format a batch report as human-readable text.
pub(super) fn format_simulate_text(
    report: &BatchReport,
    mode: Mode,
    difficulty: Difficulty,
    guesser: &str,
) -> String {
    let stats = &report.stats;
    let mut output = String::new();

    output.push_str(&format!(
        "Simulation Results ({} sessions, {mode}, {difficulty}, {guesser} guesser)\n",
        stats.games_played
    ));
    output.push_str(&format!("  Avg score:     {:.1}\n", report.avg_score()));
    output.push_str(&format!("  Best score:    {}\n", stats.best_score));
    output.push_str(&format!("  Avg rounds:    {:.2}\n", report.avg_rounds()));
    output.push_str(&format!("  Guesses:       {}\n", stats.total_guesses));
    match stats.average_distance_km() {
        Some(avg) => output.push_str(&format!("  Avg distance:  {avg:.0} km\n")),
        None => output.push_str("  Avg distance:  -\n"),
    }
    output.push_str(&format!(
        "  Out of lives:  {} ({:.1}%)\n",
        report.wiped_out,
        percent(report.wiped_out, stats.games_played)
    ));

    output
}

/// Format a finished session's summary.
pub(super) fn format_summary_lines(summary: &Summary) -> Vec<String> {
    let km = |d: Option<u32>| d.map_or_else(|| "-".to_string(), |d| format!("{d} km"));
    vec![
        format!("Mode:          {} ({})", summary.mode, summary.difficulty),
        format!("Score:         {}", summary.total_score),
        format!("Rounds played: {}", summary.rounds_played),
        format!("Best distance: {}", km(summary.best_distance_km)),
        format!("Avg distance:  {}", km(summary.avg_distance_km)),
        format!("Lives left:    {}", summary.lives_left),
    ]
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}
