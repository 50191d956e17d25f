use std::panic;
use std::thread;

use tracing::{debug, debug_span};

use crate::rng::{entropy_seed, GeneratorKind, UniformSource};

// Seed offset between neighbouring workers.
const WORKER_SEED_STRIDE: u32 = 67_890;

/// Draws `samples` points (x first, then y) and counts those inside the unit circle.
pub fn count_hits<R: UniformSource>(rng: &mut R, samples: u64) -> u64 {
    let mut inside = 0;

    for _ in 0..samples {
        let x = rng.next_uniform();
        let y = rng.next_uniform();
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
    }

    inside
}

/// Estimates π from `n_points` draws of `rng`.
///
/// `n_threads` is validated but the draws always run on the calling thread.
///
/// # Panics
///
/// Panics if `n_points` or `n_threads` is not positive.
pub fn calculate_pi<R: UniformSource>(n_points: i64, n_threads: i32, rng: &mut R) -> f64 {
    assert!(n_points > 0, "sample count must be positive, got {n_points}");
    assert!(n_threads > 0, "thread count must be positive, got {n_threads}");

    let inside = count_hits(rng, n_points as u64);
    debug!(n_points, inside, "sampling finished");

    inside as f64 * 4.0 / n_points as f64
}

/// Sample share of each worker. The last worker takes the remainder.
pub fn worker_shares(total_samples: u64, num_workers: usize) -> Vec<u64> {
    let samples_per_worker = total_samples / num_workers as u64;
    let remainder = total_samples % num_workers as u64;

    (0..num_workers)
        .map(|worker_id| {
            if worker_id == num_workers - 1 {
                samples_per_worker + remainder
            } else {
                samples_per_worker
            }
        })
        .collect()
}

/// Estimates π with the draws split across `n_threads` workers.
///
/// Each worker owns a generator of `kind` seeded from `seed` plus a per-worker
/// offset; hit counts are summed when the workers are joined.
///
/// # Panics
///
/// Panics if `n_points` or `n_threads` is not positive, or if a worker panics.
pub fn calculate_pi_partitioned(n_points: i64, n_threads: i32, kind: GeneratorKind, seed: u32) -> f64 {
    assert!(n_points > 0, "sample count must be positive, got {n_points}");
    assert!(n_threads > 0, "thread count must be positive, got {n_threads}");

    let shares = worker_shares(n_points as u64, n_threads as usize);

    let handles: Vec<_> = shares
        .into_iter()
        .enumerate()
        .map(|(worker_id, samples)| {
            let worker_seed = seed.wrapping_add((worker_id as u32).wrapping_mul(WORKER_SEED_STRIDE));

            thread::spawn(move || {
                let _span = debug_span!("sampler_worker", worker_id, samples).entered();
                let mut rng = kind.build(worker_seed);
                count_hits(&mut rng, samples)
            })
        })
        .collect();

    let mut total_inside = 0;
    for handle in handles {
        total_inside += handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload));
    }
    debug!(n_points, n_threads, total_inside, "partitioned sampling finished");

    total_inside as f64 * 4.0 / n_points as f64
}

/// How the sampler uses its thread count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// All draws on the calling thread; the thread count is only validated.
    #[default]
    Sequential,
    /// Draws split across one worker per requested thread.
    Partitioned,
}

/// A configured π estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler {
    kind: GeneratorKind,
    mode: ExecutionMode,
    seed: Option<u32>,
}

impl Sampler {
    pub fn new(kind: GeneratorKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fixes the seed instead of deriving one per run.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn estimate(&self, n_points: i64, n_threads: i32) -> f64 {
        let seed = self.seed.unwrap_or_else(entropy_seed);
        debug!(kind = ?self.kind, mode = ?self.mode, seed, "starting estimate");

        match self.mode {
            ExecutionMode::Sequential => {
                let mut rng = self.kind.build(seed);
                calculate_pi(n_points, n_threads, &mut rng)
            }
            ExecutionMode::Partitioned => calculate_pi_partitioned(n_points, n_threads, self.kind, seed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RotateRng, WyhashRng};
    use proptest::prelude::*;

    struct Fixed(Vec<f32>, usize);

    impl UniformSource for Fixed {
        fn next_uniform(&mut self) -> f32 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn boundary_counts_as_hit() {
        let mut rng = Fixed(vec![1.0, 0.0], 0);
        assert_eq!(count_hits(&mut rng, 3), 3);
        assert_eq!(calculate_pi(3, 1, &mut Fixed(vec![1.0, 0.0], 0)), 4.0);
    }

    #[test]
    fn corner_points_miss() {
        let mut rng = Fixed(vec![1.0, 1.0], 0);
        assert_eq!(calculate_pi(10, 1, &mut rng), 0.0);
    }

    #[test]
    fn alternating_hits_give_two() {
        // (0,0) hit then (1,1) miss.
        let mut rng = Fixed(vec![0.0, 0.0, 1.0, 1.0], 0);
        assert_eq!(calculate_pi(4, 4, &mut rng), 2.0);
    }

    #[test]
    fn rotate_from_zero_always_hits() {
        let mut rng = RotateRng::new(0);
        assert_eq!(calculate_pi(1_000, 2, &mut rng), 4.0);
    }

    #[test]
    fn library_converges_to_pi() {
        let pi = Sampler::new(GeneratorKind::Library).with_seed(2024).estimate(1_000_000, 1);
        assert!((3.12..=3.16).contains(&pi), "estimate {pi}");
    }

    #[test]
    fn wyhash_converges_to_pi() {
        let mut rng = WyhashRng::new(12_345);
        let pi = calculate_pi(1_000_000, 4, &mut rng);
        assert!((3.12..=3.16).contains(&pi), "estimate {pi}");
    }

    #[test]
    fn partitioned_converges_to_pi() {
        let pi = calculate_pi_partitioned(1_000_000, 8, GeneratorKind::Wyhash, 99);
        assert!((3.12..=3.16).contains(&pi), "estimate {pi}");
    }

    #[test]
    fn fixed_seed_repeats_estimate() {
        let sampler = Sampler::new(GeneratorKind::Additive).with_seed(5);
        assert_eq!(sampler.estimate(10_000, 1), sampler.estimate(10_000, 1));

        let sampler = sampler.with_mode(ExecutionMode::Partitioned);
        assert_eq!(sampler.estimate(10_000, 3), sampler.estimate(10_000, 3));
    }

    #[test]
    fn sequential_ignores_thread_count() {
        let sampler = Sampler::new(GeneratorKind::Wyhash).with_seed(77);
        assert_eq!(sampler.estimate(50_000, 1), sampler.estimate(50_000, 64));
    }

    #[test]
    fn single_worker_partition_matches_sequential() {
        let sequential = Sampler::new(GeneratorKind::Wyhash).with_seed(3);
        let partitioned = sequential.with_mode(ExecutionMode::Partitioned);
        assert_eq!(sequential.estimate(20_000, 1), partitioned.estimate(20_000, 1));
    }

    #[test]
    fn last_worker_takes_remainder() {
        assert_eq!(worker_shares(10, 3), vec![3, 3, 4]);
        assert_eq!(worker_shares(2, 4), vec![0, 0, 0, 2]);
    }

    #[test]
    #[should_panic(expected = "sample count must be positive")]
    fn zero_points_panics() {
        calculate_pi(0, 1, &mut WyhashRng::new(1));
    }

    #[test]
    #[should_panic(expected = "sample count must be positive")]
    fn negative_points_panics() {
        Sampler::default().estimate(-5, 1);
    }

    #[test]
    #[should_panic(expected = "thread count must be positive")]
    fn zero_threads_panics() {
        calculate_pi(10, 0, &mut WyhashRng::new(1));
    }

    #[test]
    #[should_panic(expected = "thread count must be positive")]
    fn partitioned_negative_threads_panics() {
        calculate_pi_partitioned(10, -2, GeneratorKind::Rotate, 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn estimate_is_within_bounds(
            seed in any::<u32>(),
            n_points in 1i64..2_000,
            kind in prop_oneof![
                Just(GeneratorKind::Library),
                Just(GeneratorKind::Rotate),
                Just(GeneratorKind::Additive),
                Just(GeneratorKind::Wyhash),
            ],
        ) {
            let pi = Sampler::new(kind).with_seed(seed).estimate(n_points, 1);
            prop_assert!((0.0..=4.0).contains(&pi));
        }

        #[test]
        fn shares_cover_every_sample(total in 0u64..1_000_000, workers in 1usize..128) {
            let shares = worker_shares(total, workers);
            prop_assert_eq!(shares.len(), workers);
            prop_assert_eq!(shares.iter().sum::<u64>(), total);
        }
    }
}
