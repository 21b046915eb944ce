//! # Search — Orchestration of a Full Run
//!
//! Builds the sieve base once, partitions the range statically, runs exactly
//! one worker per sub-range on a dedicated rayon pool of T threads, and joins
//! them all before returning. There is no cancellation: every worker scans its
//! whole sub-range even if another one failed to flush, and the first failure
//! is reported once the pool has drained.
//!
//! ## Sharing
//!
//! The base lives in an `Arc` and is only read after construction; workers
//! borrow it through a [`Scanner`]. The sink is the only lock in the system.

use rayon::prelude::*;
use rug::Integer;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::filter;
use crate::oracle::{MillerRabin, PrimalityOracle};
use crate::progress::Progress;
use crate::range::SearchRange;
use crate::sieve::SieveBase;
use crate::sink::ResultSink;
use crate::worker::{run_worker, Scanner, WorkerReport};

/// Totals for one completed run.
#[derive(Debug, Clone)]
pub struct SearchSummary {
    pub threads: usize,
    pub tested: u64,
    pub filter_passed: u64,
    pub oracle_rejected: u64,
    pub accepted: u64,
    /// Wall clock from partitioning to the last join.
    pub elapsed: Duration,
    pub workers: Vec<WorkerReport>,
}

impl SearchSummary {
    fn from_reports(threads: usize, elapsed: Duration, workers: Vec<WorkerReport>) -> Self {
        SearchSummary {
            threads,
            tested: workers.iter().map(|w| w.tested).sum(),
            filter_passed: workers.iter().map(|w| w.filter_passed).sum(),
            oracle_rejected: workers.iter().map(|w| w.oracle_rejected).sum(),
            accepted: workers.iter().map(|w| w.accepted).sum(),
            elapsed,
            workers,
        }
    }
}

/// Run a complete search over `range`, writing accepted pairs to `sink`.
pub fn run<W: Write + Send>(
    config: &SearchConfig,
    range: &SearchRange,
    sink: &ResultSink<W>,
) -> Result<SearchSummary> {
    config.validate()?;
    let threads = config.resolved_threads();
    let oracle = MillerRabin::new(config.mr_rounds)?;
    let oracle_from = config.oracle_from()?;

    let base = Arc::new(SieveBase::build(config.sieve_limit)?);
    info!(
        primes = base.len(),
        limit = config.sieve_limit,
        "sieve base built"
    );
    warn_if_uncertified(config, range, &oracle_from);

    info!(
        threads,
        range = %range,
        policy = %config.oracle_policy,
        oracle_from = %oracle_from,
        mr_rounds = oracle.reps(),
        "search starting"
    );

    let progress = Progress::new();
    let reporter = (config.progress_interval_secs > 0)
        .then(|| progress.start_reporter(Duration::from_secs(config.progress_interval_secs)));

    let start = Instant::now();
    let result = run_workers(
        &base,
        &oracle,
        &oracle_from,
        range,
        threads,
        config.qos,
        sink,
        Some(&*progress),
    );
    let elapsed = start.elapsed();

    progress.stop();
    if let Some(handle) = reporter {
        if handle.join().is_err() {
            warn!("progress reporter thread panicked; progress lines stopped early");
        }
    }

    let summary = SearchSummary::from_reports(threads, elapsed, result?);
    info!(
        tested = summary.tested,
        filter_passed = summary.filter_passed,
        oracle_rejected = summary.oracle_rejected,
        accepted = summary.accepted,
        elapsed_secs = format_args!("{:.6}", summary.elapsed.as_secs_f64()),
        "search complete"
    );
    Ok(summary)
}

/// Partition `range`, scan every sub-range on its own pool thread, join all.
///
/// Reports come back in sub-range order. If any worker fails, the others
/// still run to completion and the first error is returned.
#[allow(clippy::too_many_arguments)]
pub fn run_workers<W: Write + Send>(
    base: &SieveBase,
    oracle: &dyn PrimalityOracle,
    oracle_from: &Integer,
    range: &SearchRange,
    threads: usize,
    qos: bool,
    sink: &ResultSink<W>,
    progress: Option<&Progress>,
) -> Result<Vec<WorkerReport>> {
    let ranges = range.partition(threads)?;
    let pool = build_pool(threads, qos)?;
    let scanner = Scanner::new(base, oracle, oracle_from);

    let results: Vec<Result<WorkerReport>> = pool.install(|| {
        ranges
            .par_iter()
            .enumerate()
            .map(|(id, sub)| run_worker(id, sub, &scanner, sink, progress))
            .collect()
    });
    results.into_iter().collect()
}

/// Dedicated pool of exactly `threads` workers.
///
/// With `qos` on macOS each thread requests the user-initiated QoS class
/// (P-core scheduling on Apple Silicon); elsewhere the flag is ignored.
pub fn build_pool(threads: usize, qos: bool) -> Result<rayon::ThreadPool> {
    if threads == 0 {
        return Err(SearchError::InvalidConfiguration(
            "thread count must be >= 1".into(),
        ));
    }

    let builder = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("twinscan-worker-{}", i));

    #[cfg(target_os = "macos")]
    if qos {
        return builder
            .spawn_handler(|thread| {
                let mut b = std::thread::Builder::new();
                if let Some(name) = thread.name() {
                    b = b.name(name.to_owned());
                }
                b.spawn(move || {
                    // SAFETY: pthread_set_qos_class_self_np only changes the
                    // scheduling class of the calling thread.
                    unsafe {
                        libc::pthread_set_qos_class_self_np(
                            libc::qos_class_t::QOS_CLASS_USER_INITIATED,
                            0,
                        );
                    }
                    thread.run();
                })?;
                Ok(())
            })
            .build()
            .map_err(|e| pool_error(threads, e));
    }

    #[cfg(not(target_os = "macos"))]
    if qos {
        warn!("--qos is only effective on macOS, ignoring");
    }

    builder.build().map_err(|e| pool_error(threads, e))
}

fn pool_error(threads: usize, e: rayon::ThreadPoolBuildError) -> SearchError {
    SearchError::InvalidConfiguration(format!("cannot start {} worker threads: {}", threads, e))
}

/// Under the threshold policy, filter passes between the certified limit and
/// the oracle threshold are accepted without a full certificate.
fn warn_if_uncertified(config: &SearchConfig, range: &SearchRange, oracle_from: &Integer) {
    let certified = filter::certified_limit(config.sieve_limit);
    if range.end <= certified || range.start >= *oracle_from || certified >= *oracle_from {
        return;
    }
    let lo = (&range.start).max(&certified);
    let hi = (&range.end).min(oracle_from);
    warn!(
        from = %lo,
        to = %hi,
        sieve_limit = config.sieve_limit,
        "filter is not a full primality certificate in this window; use --oracle-policy certified to verify these pairs"
    );
}
