//! Parallel-for counter: every worker counts its own slice of the iteration
//! space and the partial counts are summed on join.

use std::ops::Range;
use std::panic;
use std::thread;

use tracing::{debug, debug_span};

/// Contiguous iteration slices, one per worker. The last slice takes the remainder.
pub fn partition(n_iters: i64, n_threads: i32) -> Vec<Range<i64>> {
    let n_threads = i64::from(n_threads);
    let iters_per_thread = n_iters / n_threads;

    (0..n_threads)
        .map(|thread_id| {
            let start = thread_id * iters_per_thread;
            let end = if thread_id == n_threads - 1 {
                n_iters
            } else {
                (thread_id + 1) * iters_per_thread
            };
            start..end
        })
        .collect()
}

/// Counts `0..n_iters` with a team of exactly `n_threads` workers.
///
/// # Panics
///
/// Panics unless `n_threads > 0` and `n_iters > n_threads`.
pub fn calculate(n_iters: i64, n_threads: i32) -> i64 {
    assert!(n_threads > 0, "thread count must be positive, got {n_threads}");
    assert!(
        n_iters > i64::from(n_threads),
        "iteration count {n_iters} must exceed thread count {n_threads}"
    );

    let handles: Vec<_> = partition(n_iters, n_threads)
        .into_iter()
        .enumerate()
        .map(|(thread_id, slice)| {
            thread::spawn(move || {
                let _span = debug_span!("increment_worker", thread_id).entered();
                let mut local = 0i64;
                for _ in slice {
                    local += 1;
                }
                local
            })
        })
        .collect();

    let mut total = 0;
    for handle in handles {
        total += handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload));
    }
    debug!(n_iters, n_threads, total, "reduction finished");

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn total_matches_iterations_for_common_team_sizes() {
        for n_threads in [1, 2, 8, 64] {
            assert_eq!(calculate(100_000, n_threads), 100_000);
        }
    }

    #[test]
    fn smallest_valid_input() {
        assert_eq!(calculate(2, 1), 2);
        assert_eq!(calculate(65, 64), 65);
    }

    #[test]
    fn slices_are_contiguous_and_disjoint() {
        let slices = partition(10, 3);
        assert_eq!(slices, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    #[should_panic(expected = "thread count must be positive")]
    fn zero_threads_panics() {
        calculate(10, 0);
    }

    #[test]
    #[should_panic(expected = "thread count must be positive")]
    fn negative_threads_panics() {
        calculate(10, -1);
    }

    #[test]
    #[should_panic(expected = "must exceed thread count")]
    fn iterations_equal_to_threads_panics() {
        calculate(4, 4);
    }

    #[test]
    #[should_panic(expected = "must exceed thread count")]
    fn negative_iterations_panics() {
        calculate(-10, 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn reduction_equals_iterations(n_threads in 1i32..16, extra in 1i64..50_000) {
            let n_iters = i64::from(n_threads) + extra;
            prop_assert_eq!(calculate(n_iters, n_threads), n_iters);
        }

        #[test]
        fn partition_covers_range(n_threads in 1i32..128, extra in 1i64..1_000_000) {
            let n_iters = i64::from(n_threads) + extra;
            let slices = partition(n_iters, n_threads);
            prop_assert_eq!(slices.len(), n_threads as usize);
            prop_assert_eq!(slices[0].start, 0);
            prop_assert_eq!(slices.last().map(|s| s.end), Some(n_iters));
            for pair in slices.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }
}
