//! # Config — Search Configuration
//!
//! Engine defaults are the fixed constants of the search (L = 10,000,000,
//! 25 Miller–Rabin rounds, oracle threshold 200,000,020,000,000). A TOML file
//! can override any of them; CLI flags override the file.
//!
//! ```toml
//! sieve_limit = 10000000
//! mr_rounds = 25
//! oracle_threshold = "200000020000000"
//! oracle_policy = "threshold"   # or "certified"
//! threads = 8
//! output = "twin_primes.txt"
//! progress_interval_secs = 30
//! qos = false
//! ```

use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, SearchError};
use crate::filter;
use crate::oracle::MR_ROUNDS;
use crate::sieve::SIEVE_LIMIT;
use crate::worker::ORACLE_THRESHOLD;

/// Thread count used when hardware parallelism cannot be detected.
pub const FALLBACK_THREADS: usize = 4;

/// Where the oracle starts confirming filter survivors.
///
/// - **Threshold**: only at `n >= oracle_threshold`. Below it a filter pass
///   is trusted even where the sieve no longer covers `sqrt(2n + 1)`.
/// - **Certified**: at `min(oracle_threshold, certified_limit(L))`, so no
///   pair is ever accepted on an incomplete trial division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OraclePolicy {
    #[default]
    Threshold,
    Certified,
}

impl fmt::Display for OraclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OraclePolicy::Threshold => write!(f, "threshold"),
            OraclePolicy::Certified => write!(f, "certified"),
        }
    }
}

impl FromStr for OraclePolicy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "threshold" => Ok(OraclePolicy::Threshold),
            "certified" => Ok(OraclePolicy::Certified),
            other => Err(SearchError::InvalidConfiguration(format!(
                "unknown oracle policy '{}' (expected threshold or certified)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub sieve_limit: u64,
    pub mr_rounds: u32,
    /// Decimal string; may exceed 64 bits.
    pub oracle_threshold: String,
    pub oracle_policy: OraclePolicy,
    /// `None` → detected hardware parallelism.
    pub threads: Option<usize>,
    pub output: PathBuf,
    /// 0 disables the background reporter.
    pub progress_interval_secs: u64,
    pub qos: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            sieve_limit: SIEVE_LIMIT,
            mr_rounds: MR_ROUNDS,
            oracle_threshold: ORACLE_THRESHOLD.to_string(),
            oracle_policy: OraclePolicy::Threshold,
            threads: None,
            output: PathBuf::from("twin_primes.txt"),
            progress_interval_secs: 30,
            qos: false,
        }
    }
}

impl SearchConfig {
    /// Load a TOML file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SearchError::InvalidConfiguration(format!("cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            SearchError::InvalidConfiguration(format!("cannot parse {}: {}", path.display(), e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(SearchError::InvalidConfiguration(
                "thread count must be >= 1".into(),
            ));
        }
        if self.sieve_limit > u32::MAX as u64 {
            return Err(SearchError::InvalidConfiguration(format!(
                "sieve limit {} exceeds {}",
                self.sieve_limit,
                u32::MAX
            )));
        }
        if self.mr_rounds == 0 {
            return Err(SearchError::InvalidConfiguration(
                "Miller-Rabin rounds must be >= 1".into(),
            ));
        }
        self.threshold()?;
        Ok(())
    }

    pub fn threshold(&self) -> Result<Integer> {
        let s = self.oracle_threshold.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SearchError::InvalidConfiguration(format!(
                "oracle threshold is not a non-negative decimal integer: {:?}",
                self.oracle_threshold
            )));
        }
        Integer::parse(s)
            .map(Integer::from)
            .map_err(|e| SearchError::InvalidConfiguration(format!("oracle threshold: {}", e)))
    }

    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(default_threads)
    }

    /// First midpoint that goes through the oracle under the active policy.
    pub fn oracle_from(&self) -> Result<Integer> {
        let threshold = self.threshold()?;
        Ok(match self.oracle_policy {
            OraclePolicy::Threshold => threshold,
            OraclePolicy::Certified => threshold.min(filter::certified_limit(self.sieve_limit)),
        })
    }
}

/// Hardware parallelism, or [`FALLBACK_THREADS`] if it cannot be detected.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_THREADS)
}
