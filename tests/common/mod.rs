//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;

/// Deterministic trial-division primality for small values.
pub fn is_prime_u64(m: u64) -> bool {
    if m < 2 {
        return false;
    }
    if m % 2 == 0 {
        return m == 2;
    }
    let mut d = 3;
    while d * d <= m {
        if m % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Every `"<p1>, <p2>"` line a correct search over midpoints `[lo, hi)` emits.
pub fn brute_force_twins(lo: u64, hi: u64) -> BTreeSet<String> {
    (lo.max(2)..hi)
        .filter(|&n| is_prime_u64(2 * n - 1) && is_prime_u64(2 * n + 1))
        .map(|n| format!("{}, {}", 2 * n - 1, 2 * n + 1))
        .collect()
}

/// Output lines as an unordered set.
pub fn line_set(text: &str) -> BTreeSet<String> {
    text.lines().map(str::to_owned).collect()
}
