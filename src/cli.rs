//! # CLI Execution
//!
//! Extracted from `main.rs` to keep the entry point slim: configuration
//! layering (defaults → TOML file → flags), endpoint prompting, and the
//! console report around [`twinscan::search::run`].

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tracing::info;
use twinscan::{search, ResultSink, SearchConfig, SearchError, SearchRange};

use super::Cli;

/// Validate everything, truncate the output, run the search, report timing.
///
/// Range and configuration errors surface before the output file is touched.
pub fn run_search(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    config.validate()?;

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let n_min = endpoint(
        cli.min.as_deref(),
        "Enter value of n_min (30+ digits allowed): ",
        &mut input,
    )?;
    let n_max = endpoint(cli.max.as_deref(), "Enter value of n_max: ", &mut input)?;
    let range = SearchRange::parse(&n_min, &n_max)?;

    let sink = ResultSink::create(&config.output)
        .with_context(|| format!("cannot open output file {}", config.output.display()))?;

    let threads = config.resolved_threads();
    println!("Starting search with {} threads...", threads);
    info!(output = %config.output.display(), "writing results");

    let summary = search::run(&config, &range, &sink)?;

    println!("Output saved to: {}", config.output.display());
    println!("Execution time: {:.6} seconds", summary.elapsed.as_secs_f64());
    Ok(())
}

/// Defaults, then the TOML file (if any), then explicit flags.
fn build_config(cli: &Cli) -> Result<SearchConfig> {
    let mut config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::default(),
    };

    if let Some(output) = &cli.output {
        config.output = output.clone();
    }
    if let Some(threads) = cli.threads {
        config.threads = Some(threads);
    }
    if let Some(limit) = cli.sieve_limit {
        config.sieve_limit = limit;
    }
    if let Some(rounds) = cli.mr_rounds {
        config.mr_rounds = rounds;
    }
    if let Some(threshold) = &cli.oracle_threshold {
        config.oracle_threshold = threshold.clone();
    }
    if let Some(policy) = cli.oracle_policy {
        config.oracle_policy = policy;
    }
    if let Some(secs) = cli.progress_interval {
        config.progress_interval_secs = secs;
    }
    config.qos |= cli.qos;
    Ok(config)
}

/// Use the flag value if given, otherwise prompt and read one line.
fn endpoint(flag: Option<&str>, prompt: &str, input: &mut impl BufRead) -> Result<String> {
    if let Some(value) = flag {
        return Ok(value.to_string());
    }

    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SearchError::InvalidInput(format!(
            "no value supplied for prompt {:?}",
            prompt.trim_end()
        ))
        .into());
    }
    Ok(line.trim().to_string())
}
