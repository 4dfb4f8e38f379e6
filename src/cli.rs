//! CLI command implementations for Pinpoint.

pub(crate) mod play;
pub(crate) mod pool;
pub(crate) mod simulate;

mod output;

use clap::ValueEnum;
use pinpoint::{Dataset, DatasetError};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SimulateFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Scripted guesser for the `simulate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum GuesserArg {
    /// Near the answer, off by up to `--error-km`.
    Noisy,
    /// Anywhere on the globe.
    Random,
    /// Never guesses (skips, or times out in arcade mode).
    Skip,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<DatasetError> for CliError {
    fn from(e: DatasetError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the dataset at `path`, or the built-in one.
pub(crate) fn load_dataset(path: Option<&Path>) -> Result<Dataset, CliError> {
    let dataset = match path {
        Some(path) => Dataset::load(path)?,
        None => Dataset::builtin()?,
    };
    if dataset.is_empty() {
        tracing::warn!("dataset has no locations");
    }
    Ok(dataset)
}

/// Use the given seed or derive one from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
