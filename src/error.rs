//! # Error — Search Failure Taxonomy
//!
//! Every failure in the engine is terminal for the run: nothing is retried and
//! nothing is surfaced per worker. Input and configuration problems are
//! detected before any work starts; sink failures abort after the pool joins.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Range endpoints that are not decimal integers, or violate `2 <= n_min < n_max`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Thread count, sieve limit, round count or config file that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("result sink I/O failed: {0}")]
    Sink(#[from] io::Error),

    /// A worker panicked while holding the sink lock.
    #[error("result sink lock poisoned")]
    SinkPoisoned,
}
