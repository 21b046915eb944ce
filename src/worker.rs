//! # Worker — Sequential Scan of One Sub-Range
//!
//! Each worker walks its midpoints in ascending order and drives one small
//! state machine per candidate:
//!
//! ```text
//! FILTERING ─┬─ reject ──────────────────────────────► Rejected
//!            └─ pass ─┬─ n <  oracle_from ──────────► FilterAccepted
//!                     └─ n >= oracle_from ─ ORACLE ─┬► OracleAccepted
//!                                                   └► OracleRejected
//! ```
//!
//! Accepted pairs go into a worker-local buffer in discovery order. When the
//! range is exhausted the buffer is handed to the sink in one block; there are
//! no partial flushes and no retries.

use rug::Integer;
use std::fmt;
use std::io::Write;
use tracing::debug;

use crate::error::Result;
use crate::filter;
use crate::oracle::PrimalityOracle;
use crate::progress::Progress;
use crate::range::SearchRange;
use crate::sieve::SieveBase;
use crate::sink::ResultSink;

/// Midpoint at which the oracle starts confirming filter survivors.
pub const ORACLE_THRESHOLD: u64 = 200_000_020_000_000;

/// Candidates scanned between progress publications.
const PROGRESS_BATCH: u64 = 4096;

/// An accepted pair `(2n − 1, 2n + 1)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TwinPair {
    pub lower: Integer,
    pub upper: Integer,
}

impl TwinPair {
    pub fn from_midpoint(n: &Integer) -> Self {
        let doubled = Integer::from(n * 2u32);
        TwinPair {
            lower: Integer::from(&doubled - 1u32),
            upper: doubled + 1u32,
        }
    }

    pub fn midpoint(&self) -> Integer {
        Integer::from(&self.lower + 1u32) / 2u32
    }
}

impl fmt::Display for TwinPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lower, self.upper)
    }
}

/// Terminal state of one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Rejected,
    /// Passed the filter below the oracle threshold.
    FilterAccepted,
    /// Passed the filter and both members passed the oracle.
    OracleAccepted,
    /// Passed the filter but at least one member failed the oracle.
    OracleRejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        matches!(self, Verdict::FilterAccepted | Verdict::OracleAccepted)
    }
}

/// Everything a worker needs to judge a candidate. Borrowed, read-only, and
/// shared by all workers.
#[derive(Clone, Copy)]
pub struct Scanner<'a> {
    base: &'a SieveBase,
    oracle: &'a dyn PrimalityOracle,
    oracle_from: &'a Integer,
}

/// What a finished scan produced.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub pairs: Vec<TwinPair>,
    pub tested: u64,
    pub filter_passed: u64,
    pub oracle_rejected: u64,
}

/// Per-worker summary returned to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub tested: u64,
    pub filter_passed: u64,
    pub oracle_rejected: u64,
    pub accepted: u64,
}

impl<'a> Scanner<'a> {
    pub fn new(
        base: &'a SieveBase,
        oracle: &'a dyn PrimalityOracle,
        oracle_from: &'a Integer,
    ) -> Self {
        Scanner {
            base,
            oracle,
            oracle_from,
        }
    }

    pub fn classify(&self, n: &Integer) -> Verdict {
        if !filter::passes(self.base, n) {
            return Verdict::Rejected;
        }
        if n < self.oracle_from {
            return Verdict::FilterAccepted;
        }

        let pair = TwinPair::from_midpoint(n);
        if self.oracle.is_probable_prime(&pair.lower) && self.oracle.is_probable_prime(&pair.upper)
        {
            Verdict::OracleAccepted
        } else {
            Verdict::OracleRejected
        }
    }

    /// Scan `range` in ascending order, buffering accepted pairs.
    pub fn scan(&self, range: &SearchRange, progress: Option<&Progress>) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        let mut unpublished = 0u64;
        let mut found_unpublished = 0u64;

        let mut n = range.start.clone();
        while n < range.end {
            let verdict = self.classify(&n);
            if verdict != Verdict::Rejected {
                outcome.filter_passed += 1;
            }
            match verdict {
                Verdict::FilterAccepted | Verdict::OracleAccepted => {
                    debug_assert!(range.contains(&n));
                    let pair = TwinPair::from_midpoint(&n);
                    debug_assert_eq!(pair.midpoint(), n);
                    outcome.pairs.push(pair);
                    found_unpublished += 1;
                }
                Verdict::OracleRejected => outcome.oracle_rejected += 1,
                Verdict::Rejected => {}
            }

            outcome.tested += 1;
            unpublished += 1;
            if unpublished == PROGRESS_BATCH {
                if let Some(p) = progress {
                    p.record(unpublished, found_unpublished);
                }
                unpublished = 0;
                found_unpublished = 0;
            }
            n += 1u32;
        }

        if let Some(p) = progress {
            p.record(unpublished, found_unpublished);
        }
        outcome
    }
}

/// Scan one sub-range and flush its buffer to the sink in a single block.
pub fn run_worker<W: Write + Send>(
    id: usize,
    range: &SearchRange,
    scanner: &Scanner<'_>,
    sink: &ResultSink<W>,
    progress: Option<&Progress>,
) -> Result<WorkerReport> {
    debug!(worker = id, range = %range, "worker started");
    let outcome = scanner.scan(range, progress);
    sink.append_block(&outcome.pairs)?;

    let report = WorkerReport {
        id,
        tested: outcome.tested,
        filter_passed: outcome.filter_passed,
        oracle_rejected: outcome.oracle_rejected,
        accepted: outcome.pairs.len() as u64,
    };
    debug!(
        worker = id,
        tested = report.tested,
        accepted = report.accepted,
        oracle_rejected = report.oracle_rejected,
        "worker finished"
    );
    Ok(report)
}
