//! # Main — CLI Entry Point
//!
//! Reads the range endpoints (flags, env, or interactive prompt), merges the
//! configuration layers, truncates the output file, and hands off to
//! [`twinscan::search::run`].
//!
//! ## Options
//!
//! - `--min` / `--max` (`TWINSCAN_MIN` / `TWINSCAN_MAX`): range endpoints;
//!   prompted for on stdin when absent.
//! - `--output`: result file, truncated at start (default `twin_primes.txt`).
//! - `--threads`: worker count (default: detected parallelism, fallback 4).
//! - `--config`: TOML file with any `SearchConfig` field; flags win over it.
//! - `--sieve-limit`, `--mr-rounds`, `--oracle-threshold`, `--oracle-policy`:
//!   engine tuning, defaulting to L = 10^7, 25 rounds, 200000020000000.
//! - `--progress-interval`: seconds between progress lines (0 = off).
//! - `--qos`: macOS QoS P-core scheduling for the worker pool.
//!
//! Logging: `LOG_FORMAT=json` for JSON lines, human-readable on stderr
//! otherwise; `RUST_LOG` sets the level (default `info`).

mod cli;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "twinscan",
    version,
    about = "Search a range of midpoints n for twin primes (2n-1, 2n+1)"
)]
pub struct Cli {
    /// Lower bound n_min (inclusive, >= 2, any number of digits)
    #[arg(long, env = "TWINSCAN_MIN")]
    min: Option<String>,

    /// Upper bound n_max (exclusive, > n_min)
    #[arg(long, env = "TWINSCAN_MAX")]
    max: Option<String>,

    /// Output file for "<p1>, <p2>" lines (truncated at start)
    #[arg(long, env = "TWINSCAN_OUTPUT")]
    output: Option<PathBuf>,

    /// Number of worker threads (defaults to all logical cores)
    #[arg(long, env = "TWINSCAN_THREADS")]
    threads: Option<usize>,

    /// TOML configuration file; command-line flags override its values
    #[arg(long, env = "TWINSCAN_CONFIG")]
    config: Option<PathBuf>,

    /// Largest prime in the residue filter table
    #[arg(long, env = "TWINSCAN_SIEVE_LIMIT")]
    sieve_limit: Option<u64>,

    /// Miller-Rabin rounds for pairs at or above the oracle threshold
    #[arg(long, env = "TWINSCAN_MR_ROUNDS")]
    mr_rounds: Option<u32>,

    /// Midpoint from which filter survivors are confirmed with Miller-Rabin
    #[arg(long, env = "TWINSCAN_ORACLE_THRESHOLD")]
    oracle_threshold: Option<String>,

    /// "threshold" keeps the fixed threshold; "certified" also runs Miller-Rabin
    /// wherever the sieve no longer covers sqrt(2n+1)
    #[arg(long, env = "TWINSCAN_ORACLE_POLICY")]
    oracle_policy: Option<twinscan::OraclePolicy>,

    /// Seconds between progress log lines (0 disables)
    #[arg(long, env = "TWINSCAN_PROGRESS_INTERVAL")]
    progress_interval: Option<u64>,

    /// Set macOS QoS class to user-initiated for worker threads (P-core scheduling on Apple Silicon)
    #[arg(long)]
    qos: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::run_search(&cli)
}
