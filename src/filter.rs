//! # Filter — Modular Residue Candidate Filter
//!
//! Rejects most composite pairs `(2n − 1, 2n + 1)` before any primality test
//! runs, by trial division expressed as residues of the midpoint n.
//!
//! ## Algorithm
//!
//! For each index a in the ascending sequence `A` with `a <= (isqrt(2n + 1) − 1) / 2`,
//! the odd prime q = 2a + 1 divides `2n + 1` exactly when `n mod q == a`. The
//! same walk over `B` with `(n − 1) mod q == b` covers `2n − 1`. The first
//! hit rejects; once an index exceeds its bound the scan stops, which is exact
//! because the sequences are sorted.
//!
//! A pass means neither member has an odd prime factor `<= min(L, sqrt)`.
//! When `sqrt(2n + 1) <= L` that is a full primality certificate for both
//! members; beyond [`certified_limit`] it is only a necessary condition.

use rug::Integer;

use crate::sieve::SieveBase;

/// Decide whether midpoint `n` survives trial division by the sieve base.
///
/// Midpoints below 2 never pass: the pair would contain 1 or a negative.
pub fn passes(base: &SieveBase, n: &Integer) -> bool {
    if *n < 2u32 {
        return false;
    }

    let p_plus = Integer::from(n * 2u32) + 1u32;
    if hits(base.a(), n, index_bound(p_plus)) {
        return false;
    }

    let p_minus = Integer::from(n * 2u32) - 1u32;
    let n_minus = Integer::from(n - 1u32);
    !hits(base.b(), &n_minus, index_bound(p_minus))
}

/// Largest admissible index for `p`: `(isqrt(p) − 1) / 2`, saturated to `u32`.
fn index_bound(p: Integer) -> u32 {
    let root = p.sqrt();
    let upper = (root - 1u32) / 2u32;
    upper.to_u32().unwrap_or(u32::MAX)
}

/// True if some index `x <= upper` in `indices` has `value mod (2x + 1) == x`.
#[inline]
fn hits(indices: &[u32], value: &Integer, upper: u32) -> bool {
    indices
        .iter()
        .take_while(|&&x| x <= upper)
        .any(|&x| value.mod_u(2 * x + 1) == x)
}

/// First midpoint at which a base built for `limit` no longer covers
/// `isqrt(2n + 1)`: `((L + 1)^2 − 1) / 2`.
///
/// Every `n` strictly below this value gets an exact verdict from [`passes`].
pub fn certified_limit(limit: u64) -> Integer {
    let l1 = Integer::from(limit) + 1u32;
    (Integer::from(l1.square_ref()) - 1u32) / 2u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prime_trial(m: u64) -> bool {
        if m < 2 {
            return false;
        }
        let mut d = 2;
        while d * d <= m {
            if m % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    #[test]
    fn twin_midpoints_pass() {
        let base = SieveBase::build(1000).unwrap();
        for n in [2u32, 3, 6, 9, 15, 21, 30, 36, 51, 54, 69, 75, 90, 96, 99] {
            assert!(passes(&base, &Integer::from(n)), "n={} should pass", n);
        }
    }

    /// n=4 → (7, 9): 3 | 9 is caught on the A side.
    /// n=5 → (9, 11): 3 | 9 is caught on the B side.
    #[test]
    fn composite_members_rejected_on_each_side() {
        let base = SieveBase::build(1000).unwrap();
        assert!(!passes(&base, &Integer::from(4)));
        assert!(!passes(&base, &Integer::from(5)));
        assert!(!passes(&base, &Integer::from(7))); // (13, 15)
    }

    #[test]
    fn midpoints_below_two_rejected() {
        let base = SieveBase::build(100).unwrap();
        assert!(!passes(&base, &Integer::from(1)));
        assert!(!passes(&base, &Integer::from(0)));
        assert!(!passes(&base, &Integer::from(-5)));
    }

    /// n=24 → (47, 49): the only divisor of 49 is 7, the last index (3)
    /// within the bound (isqrt(49) − 1) / 2 = 3.
    #[test]
    fn divisor_at_last_scanned_index_rejects() {
        let base = SieveBase::from_indices(vec![1, 2, 3], vec![1, 2, 3]).unwrap();
        assert!(!passes(&base, &Integer::from(24)));

        // Without 7 in the table the composite slips through.
        let short = SieveBase::from_indices(vec![1, 2], vec![1, 2]).unwrap();
        assert!(passes(&short, &Integer::from(24)));
    }

    /// n=6 → (11, 13). Index 6 (prime 13) sits in A past the bound; scanning
    /// it would see 6 mod 13 == 6 and wrongly reject the pair.
    #[test]
    fn scan_stops_at_bound() {
        let base = SieveBase::build(13).unwrap();
        assert!(base.a().contains(&6));
        assert!(passes(&base, &Integer::from(6)));
    }

    #[test]
    fn matches_trial_division_within_certified_range() {
        let base = SieveBase::build(100).unwrap();
        let limit = certified_limit(100).to_u64().unwrap();
        for n in 2..limit {
            let expected = is_prime_trial(2 * n - 1) && is_prime_trial(2 * n + 1);
            assert_eq!(
                passes(&base, &Integer::from(n)),
                expected,
                "filter disagrees with trial division at n={}",
                n
            );
        }
    }

    /// n=84 → (167, 169 = 13^2). A base holding only 3, 5, 7 is exact up to
    /// n=60; past that, 13^2 slips through.
    #[test]
    fn incomplete_table_admits_composites_past_limit() {
        let base = SieveBase::build(10).unwrap();
        assert!(Integer::from(84) >= certified_limit(10));
        assert!(passes(&base, &Integer::from(84)));
        assert!(!is_prime_trial(169));
    }

    #[test]
    fn certified_limit_values() {
        assert_eq!(certified_limit(10), 60); // (121 - 1) / 2
        assert_eq!(certified_limit(100), 5100);
        assert_eq!(
            certified_limit(crate::sieve::SIEVE_LIMIT),
            Integer::from(50_000_010_000_000u64)
        );
    }

    #[test]
    fn huge_midpoint_saturates_bound() {
        use rug::ops::Pow;

        assert_eq!(index_bound(Integer::from(10u32).pow(40)), u32::MAX);
        // 10^40 - 1 is divisible by 3 and 10^40 + 1 by 17.
        let base = SieveBase::build(1000).unwrap();
        let n = Integer::from(10u32).pow(40) / 2u32;
        assert!(!passes(&base, &n));
    }
}
