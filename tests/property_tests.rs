//! Property-based tests for the search engine.
//!
//! These use `proptest` to check invariants across randomly generated
//! ranges, thread counts and midpoints:
//!
//! - **Partitioner**: sub-ranges tile `[n_min, n_max)` exactly, in order,
//!   with every piece at least `floor(len / T)` long.
//! - **Filter soundness**: a true twin-prime midpoint is never rejected.
//! - **Filter exactness**: inside the certified range a pass means both
//!   members are prime.
//! - **Pipeline**: the written result set equals brute force for any small
//!   range and thread count.
//!
//! ```bash
//! cargo test --test property_tests
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```

mod common;

use proptest::prelude::*;
use rug::Integer;
use std::sync::OnceLock;
use twinscan::filter;
use twinscan::{search, ResultSink, SearchConfig, SearchRange, SieveBase};

/// Covers isqrt(2n + 1) for every n below 5,000,100,000.
fn shared_base() -> &'static SieveBase {
    static BASE: OnceLock<SieveBase> = OnceLock::new();
    BASE.get_or_init(|| SieveBase::build(100_000).unwrap())
}

// == Partitioner ===============================================================

proptest! {
    #[test]
    fn prop_partition_tiles_range(
        start in 2u64..1_000_000_000,
        len in 1u64..1_000_000,
        threads in 1usize..64,
    ) {
        let range = SearchRange::new(Integer::from(start), Integer::from(start + len));
        let parts = range.partition(threads).unwrap();
        let chunk = len / threads as u64;

        prop_assert_eq!(parts.len(), threads);
        prop_assert_eq!(&parts[0].start, &range.start);
        prop_assert_eq!(&parts[threads - 1].end, &range.end);
        for w in parts.windows(2) {
            prop_assert_eq!(&w[0].end, &w[1].start);
        }
        for p in &parts {
            prop_assert!(p.len() >= chunk);
        }
        let total: Integer = parts.iter().map(SearchRange::len).sum();
        prop_assert_eq!(total, Integer::from(len));
    }

    /// Same tiling far beyond 64 bits.
    #[test]
    fn prop_partition_tiles_huge_range(
        exp in 20u32..120,
        len in 1u64..10_000_000,
        threads in 1usize..33,
    ) {
        use rug::ops::Pow;
        let start = Integer::from(10u32).pow(exp);
        let range = SearchRange::new(start.clone(), Integer::from(&start + len));
        let parts = range.partition(threads).unwrap();
        let total: Integer = parts.iter().map(SearchRange::len).sum();
        prop_assert_eq!(total, Integer::from(len));
        prop_assert!(parts.windows(2).all(|w| w[0].end == w[1].start));
    }
}

// == Filter ====================================================================

proptest! {
    #[test]
    fn prop_filter_never_rejects_twin_midpoint(n in 2u64..2_000_000_000) {
        if common::is_prime_u64(2 * n - 1) && common::is_prime_u64(2 * n + 1) {
            prop_assert!(filter::passes(shared_base(), &Integer::from(n)));
        }
    }

    #[test]
    fn prop_filter_exact_in_certified_range(n in 2u64..2_000_000_000) {
        let both = common::is_prime_u64(2 * n - 1) && common::is_prime_u64(2 * n + 1);
        prop_assert_eq!(filter::passes(shared_base(), &Integer::from(n)), both);
    }

    /// A product of two table primes is caught as either member of a pair.
    #[test]
    fn prop_filter_rejects_semiprime_members(i in 0usize..2000, j in 0usize..2000) {
        let a = shared_base().a();
        let (p, q) = (2 * a[i] as u64 + 1, 2 * a[j] as u64 + 1);
        let m = p * q;
        prop_assert!(!filter::passes(shared_base(), &Integer::from((m - 1) / 2)));
        prop_assert!(!filter::passes(shared_base(), &Integer::from((m + 1) / 2)));
    }
}

// == Pipeline ==================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_search_matches_brute_force(
        lo in 2u64..50_000,
        len in 1u64..3_000,
        threads in 1usize..9,
    ) {
        let config = SearchConfig {
            sieve_limit: 1_000,
            threads: Some(threads),
            progress_interval_secs: 0,
            ..Default::default()
        };
        let range = SearchRange::new(Integer::from(lo), Integer::from(lo + len));
        let sink = ResultSink::new(Vec::new());
        let summary = search::run(&config, &range, &sink).unwrap();

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let expected = common::brute_force_twins(lo, lo + len);
        prop_assert_eq!(summary.tested, len);
        prop_assert_eq!(summary.accepted as usize, expected.len());
        prop_assert_eq!(common::line_set(&text), expected);
    }
}

/// Midpoints 2..=36 produce exactly the twin pairs with both members below 100.
#[test]
fn twins_below_one_hundred() {
    let config = SearchConfig {
        threads: Some(3),
        progress_interval_secs: 0,
        ..Default::default()
    };
    let range = SearchRange::parse("2", "37").unwrap();
    let sink = ResultSink::new(Vec::new());
    search::run(&config, &range, &sink).unwrap();

    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    let expected: std::collections::BTreeSet<String> = [
        (3, 5),
        (5, 7),
        (11, 13),
        (17, 19),
        (29, 31),
        (41, 43),
        (59, 61),
        (71, 73),
    ]
    .iter()
    .map(|(a, b)| format!("{}, {}", a, b))
    .collect();
    assert_eq!(common::line_set(&text), expected);
}
