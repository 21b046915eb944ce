//! # Oracle — Probabilistic Primality Test
//!
//! Miller–Rabin via GMP (`rug::Integer::is_probably_prime`), consulted only for
//! filter survivors at or above the activation threshold. A composite is
//! reported "prime" with probability at most 4^(−reps).
//!
//! The [`PrimalityOracle`] trait is the seam between the worker loop and the
//! test itself, so alternative oracles (or instrumented ones) can be plugged in
//! without touching the scan.

use rug::integer::IsPrime;
use rug::Integer;

use crate::error::{Result, SearchError};

/// Default Miller–Rabin repetitions per member.
pub const MR_ROUNDS: u32 = 25;

/// A pure verdict on a single integer: `true` means "probably prime".
pub trait PrimalityOracle: Send + Sync {
    fn is_probable_prime(&self, m: &Integer) -> bool;
}

/// GMP Miller–Rabin with a fixed repetition count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MillerRabin {
    reps: u32,
}

impl MillerRabin {
    pub fn new(reps: u32) -> Result<Self> {
        if reps == 0 {
            return Err(SearchError::InvalidConfiguration(
                "Miller-Rabin rounds must be >= 1".into(),
            ));
        }
        Ok(MillerRabin { reps })
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }
}

impl Default for MillerRabin {
    fn default() -> Self {
        MillerRabin { reps: MR_ROUNDS }
    }
}

impl PrimalityOracle for MillerRabin {
    /// Two fast rounds first, the full count only for survivors; most
    /// composites fail inside the pre-screen.
    fn is_probable_prime(&self, m: &Integer) -> bool {
        if self.reps > 2 && m.is_probably_prime(2) == IsPrime::No {
            return false;
        }
        m.is_probably_prime(self.reps) != IsPrime::No
    }
}
