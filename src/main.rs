//! Pinpoint CLI - play the guessing game in a terminal or simulate sessions.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use pinpoint::{Difficulty, Locale, Mode};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Pinpoint - guess where in the world you are
#[derive(Parser, Debug)]
#[command(name = "pinpoint")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play an interactive session in the terminal
    Play {
        /// Game mode: quick (fixed rounds) or arcade (timed, until lives run out)
        #[arg(short, long, default_value = "quick")]
        mode: Mode,

        /// Difficulty: easy, normal, or hard
        #[arg(short, long, default_value = "normal")]
        difficulty: Difficulty,

        /// Display language: en or uk
        #[arg(short, long, default_value = "en")]
        locale: Locale,

        /// Random seed for the location order (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Location dataset JSON file (default: built-in)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Rounds in quick mode (default: 5)
        #[arg(short, long)]
        rounds: Option<u32>,
    },

    /// Run many scripted sessions in parallel and aggregate statistics
    Simulate {
        /// Number of sessions to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each session)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Game mode: quick or arcade
        #[arg(short, long, default_value = "quick")]
        mode: Mode,

        /// Difficulty: easy, normal, or hard
        #[arg(short, long, default_value = "normal")]
        difficulty: Difficulty,

        /// Scripted guesser
        #[arg(long, default_value = "noisy")]
        guesser: cli::GuesserArg,

        /// Maximum error of the noisy guesser in km (default: 1500)
        #[arg(short, long, default_value = "1500")]
        error_km: f64,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Location dataset JSON file (default: built-in)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::SimulateFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Print the location pool a session would use
    Pool {
        /// Difficulty: easy, normal, or hard
        #[arg(short, long, default_value = "normal")]
        difficulty: Difficulty,

        /// Random seed for the shuffle (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Display language: en or uk
        #[arg(short, long, default_value = "en")]
        locale: Locale,

        /// Location dataset JSON file (default: built-in)
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pinpoint=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let result = match args.command {
        Commands::Play {
            mode,
            difficulty,
            locale,
            seed,
            dataset,
            rounds,
        } => cli::play::execute(mode, difficulty, locale, seed, dataset, rounds),

        Commands::Simulate {
            games,
            seed,
            mode,
            difficulty,
            guesser,
            error_km,
            threads,
            dataset,
            format,
            progress,
        } => cli::simulate::execute(
            games, seed, mode, difficulty, guesser, error_km, threads, dataset, format, progress,
        ),

        Commands::Pool {
            difficulty,
            seed,
            locale,
            dataset,
        } => cli::pool::execute(difficulty, seed, locale, dataset),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
