//! # Sieve — Small-Prime Table Builder
//!
//! Builds the fixed sieve base consulted by the candidate filter. Provides:
//!
//! 1. **Prime generation** via an odd-only sieve of Eratosthenes packed into a
//!    [`OddBitmap`] (one bit per odd number).
//! 2. **Sieve base** ([`SieveBase`]): two ascending index sequences `A` and `B`,
//!    each holding `(p - 1) / 2` for every odd prime `p <= L`.
//!
//! ## Why indices instead of primes
//!
//! For a candidate midpoint n and odd prime q = 2a + 1, the identity
//! `2n + 1 ≡ 0 (mod q)  ⇔  n ≡ a (mod q)` lets the filter test divisibility of
//! the pair members without ever materialising them per prime. `A` drives the
//! `2n + 1` side and `B` the `2n − 1` side (via `n − 1 ≡ b`).
//!
//! ## Invariants
//!
//! Both sequences are strictly ascending and immutable once built. The filter's
//! early exit relies on the ordering, so [`SieveBase::from_indices`] rejects
//! anything unsorted. Every index fits `u32` with `2a + 1 <= u32::MAX`, which
//! lets the filter reduce arbitrary-precision candidates with a single-limb
//! `mod_u` per prime.
//!
//! ## References
//!
//! - Eratosthenes of Cyrene, ~240 BCE (sieve algorithm).
//! - OEIS [A000720](https://oeis.org/A000720): pi(n), the prime counting function.

use crate::error::{Result, SearchError};

/// Default sieve limit L: every odd prime up to this bound enters the base.
pub const SIEVE_LIMIT: u64 = 10_000_000;

/// Primality marks for the odd numbers `1, 3, 5, ..., 2 * len - 1`.
///
/// Slot `i` stands for `2i + 1`; slots are packed 64 to a `u64` word and
/// words past `len` carry no set bits.
pub struct OddBitmap {
    words: Vec<u64>,
    len: usize,
}

impl OddBitmap {
    /// Every odd number up to `limit` starts out marked as a candidate.
    pub fn up_to(limit: usize) -> Self {
        let len = limit.div_ceil(2);
        let mut words = vec![u64::MAX; len.div_ceil(64)];
        if let Some(last) = words.last_mut() {
            let used = len % 64;
            if used != 0 {
                *last = (1u64 << used) - 1;
            }
        }
        OddBitmap { words, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_marked(&self, slot: usize) -> bool {
        debug_assert!(slot < self.len, "slot {} out of {}", slot, self.len);
        (self.words[slot >> 6] >> (slot & 63)) & 1 == 1
    }

    #[inline]
    pub fn strike(&mut self, slot: usize) {
        debug_assert!(slot < self.len, "slot {} out of {}", slot, self.len);
        self.words[slot >> 6] &= !(1u64 << (slot & 63));
    }

    pub fn marked_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Odd values (`2i + 1`) still marked, ascending.
    pub fn marked_values(&self) -> impl Iterator<Item = u64> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &bits)| {
            let mut rest = bits;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let slot = w * 64 + rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(2 * slot as u64 + 1)
            })
        })
    }
}

/// Every prime up to `limit` (inclusive), ascending.
///
/// Odd-only Eratosthenes over an [`OddBitmap`]: for each surviving q with
/// `q * q <= limit`, strike `q * q, q * q + 2q, ...`.
pub fn generate_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return vec![];
    }

    let limit = limit as usize;
    let mut odd = OddBitmap::up_to(limit);
    odd.strike(0);

    let mut q = 3;
    while q * q <= limit {
        if odd.is_marked(q / 2) {
            for slot in (q * q / 2..odd.len()).step_by(q) {
                odd.strike(slot);
            }
        }
        q += 2;
    }

    let mut primes = Vec::with_capacity(odd.marked_count() + 1);
    primes.push(2);
    primes.extend(odd.marked_values());
    primes
}

/// The read-only table shared by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SieveBase {
    a: Vec<u32>,
    b: Vec<u32>,
    limit: u64,
}

impl SieveBase {
    /// Build the base from every odd prime `p <= limit`, pushing `(p - 1) / 2`
    /// onto both sequences in one ascending pass.
    pub fn build(limit: u64) -> Result<Self> {
        if limit > u32::MAX as u64 {
            return Err(SearchError::InvalidConfiguration(format!(
                "sieve limit {} exceeds {}",
                limit,
                u32::MAX
            )));
        }

        let primes = generate_primes(limit);
        let mut a = Vec::with_capacity(primes.len());
        let mut b = Vec::with_capacity(primes.len());
        for &p in primes.iter().filter(|&&p| p % 2 == 1) {
            let idx = ((p - 1) / 2) as u32;
            a.push(idx);
            b.push(idx);
        }
        Ok(SieveBase { a, b, limit })
    }

    /// Assemble a base from explicit index sequences.
    ///
    /// Each sequence must be strictly ascending, non-zero (index 0 would be the
    /// modulus 1), and small enough that `2x + 1` fits `u32`. The recorded
    /// limit is the largest modulus present.
    pub fn from_indices(a: Vec<u32>, b: Vec<u32>) -> Result<Self> {
        for (name, seq) in [("A", &a), ("B", &b)] {
            if seq.windows(2).any(|w| w[0] >= w[1]) {
                return Err(SearchError::InvalidConfiguration(format!(
                    "sieve sequence {} is not strictly ascending",
                    name
                )));
            }
            if seq.first() == Some(&0) || seq.last().is_some_and(|&x| x > (u32::MAX - 1) / 2) {
                return Err(SearchError::InvalidConfiguration(format!(
                    "sieve sequence {} holds an index outside [1, {}]",
                    name,
                    (u32::MAX - 1) / 2
                )));
            }
        }
        let top = a.last().copied().max(b.last().copied()).unwrap_or(0);
        let limit = 2 * top as u64 + 1;
        Ok(SieveBase { a, b, limit })
    }

    /// Indices scanned against `2n + 1`.
    pub fn a(&self) -> &[u32] {
        &self.a
    }

    /// Indices scanned against `2n − 1`.
    pub fn b(&self) -> &[u32] {
        &self.b
    }

    /// Upper bound L the base was built for.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of odd primes in the base.
    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty() && self.b.is_empty()
    }
}
