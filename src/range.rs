//! # Range — Search Interval Parsing and Static Partitioning
//!
//! A search covers the half-open interval `[n_min, n_max)` of midpoints. The
//! partitioner cuts it into exactly `T` contiguous, disjoint sub-ranges of
//! `floor(len / T)` candidates each; the last sub-range absorbs the remainder.
//! Ranges are sized by candidate count, not by expected hit density.

use rug::Integer;
use std::fmt;

use crate::error::{Result, SearchError};

/// Half-open interval `[start, end)` of arbitrary-precision midpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRange {
    pub start: Integer,
    pub end: Integer,
}

impl SearchRange {
    pub fn new(start: Integer, end: Integer) -> Self {
        SearchRange { start, end }
    }

    /// Parse and validate user-supplied endpoints.
    ///
    /// Both strings must be decimal integers (surrounding whitespace is
    /// ignored) with `n_min >= 2` and `n_max > n_min`.
    pub fn parse(n_min: &str, n_max: &str) -> Result<Self> {
        let start = parse_decimal("n_min", n_min)?;
        let end = parse_decimal("n_max", n_max)?;

        if start < 2u32 {
            return Err(SearchError::InvalidInput(format!(
                "n_min must be >= 2 (got {})",
                start
            )));
        }
        if end <= start {
            return Err(SearchError::InvalidInput(format!(
                "n_max must be greater than n_min (got n_min={}, n_max={})",
                start, end
            )));
        }
        Ok(SearchRange { start, end })
    }

    /// Number of midpoints in the range (zero if `end <= start`).
    pub fn len(&self) -> Integer {
        if self.end <= self.start {
            return Integer::new();
        }
        Integer::from(&self.end - &self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, n: &Integer) -> bool {
        *n >= self.start && *n < self.end
    }

    /// Split into `threads` contiguous sub-ranges covering `self` exactly.
    ///
    /// Sub-range `i` starts at `start + i * chunk` where
    /// `chunk = floor(len / threads)`; the last one ends at `self.end`.
    /// When `len < threads` the leading sub-ranges are empty.
    pub fn partition(&self, threads: usize) -> Result<Vec<SearchRange>> {
        if threads == 0 {
            return Err(SearchError::InvalidConfiguration(
                "thread count must be >= 1".into(),
            ));
        }

        let chunk = self.len() / Integer::from(threads);
        let mut ranges = Vec::with_capacity(threads);
        let mut start = self.start.clone();
        for i in 0..threads {
            let end = if i == threads - 1 {
                self.end.clone()
            } else {
                Integer::from(&start + &chunk)
            };
            ranges.push(SearchRange::new(start, end.clone()));
            start = end;
        }
        Ok(ranges)
    }
}

impl fmt::Display for SearchRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

fn parse_decimal(name: &str, raw: &str) -> Result<Integer> {
    let s = raw.trim();
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SearchError::InvalidInput(format!(
            "{} is not a decimal integer: {:?}",
            name, raw
        )));
    }
    Integer::parse(s)
        .map(Integer::from)
        .map_err(|e| SearchError::InvalidInput(format!("{}: {}", name, e)))
}
