//! # twinscan — Twin Prime Search over Arbitrary-Precision Ranges
//!
//! Finds pairs `(2n − 1, 2n + 1)` with both members prime for every midpoint
//! n in `[n_min, n_max)`. Candidates go through a modular residue filter
//! against a fixed table of small primes; survivors at or above an activation
//! threshold are additionally confirmed with Miller–Rabin. The range is split
//! statically across a fixed pool of workers, each of which buffers its hits
//! and flushes them to a shared sink once.
//!
//! ```no_run
//! use twinscan::{search, ResultSink, SearchConfig, SearchRange};
//!
//! let range = SearchRange::parse("2", "1000000")?;
//! let sink = ResultSink::create("twin_primes.txt".as_ref())?;
//! let summary = search::run(&SearchConfig::default(), &range, &sink)?;
//! println!("{} pairs", summary.accepted);
//! # Ok::<(), twinscan::SearchError>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod oracle;
pub mod progress;
pub mod range;
pub mod search;
pub mod sieve;
pub mod sink;
pub mod worker;

pub use config::{OraclePolicy, SearchConfig};
pub use error::{Result, SearchError};
pub use oracle::{MillerRabin, PrimalityOracle};
pub use range::SearchRange;
pub use search::SearchSummary;
pub use sieve::SieveBase;
pub use sink::ResultSink;
pub use worker::{Scanner, TwinPair, Verdict};
