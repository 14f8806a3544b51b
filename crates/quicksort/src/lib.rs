mod algorithms;
mod completion;
mod error;
pub mod pool;

use std::sync::Arc;

use tracing::warn;

pub use algorithms::common::{is_sorted_non_decreasing, median3};
pub use algorithms::parallel::ParallelQuicksort;
pub use algorithms::sequential;
pub use error::{SortError, SubmitError};
pub use pool::{FixedPool, RejectingPool, WorkItem, WorkerPool, default_pool};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SortAlgorithm {
    QuickSortSequential,
    QuickSortParallel,
}

pub const ALL_ALGORITHMS: [SortAlgorithm; 2] = [
    SortAlgorithm::QuickSortSequential,
    SortAlgorithm::QuickSortParallel,
];

pub fn all_algorithms() -> &'static [SortAlgorithm] {
    &ALL_ALGORITHMS
}

pub fn algorithm_name(algo: SortAlgorithm) -> &'static str {
    match algo {
        SortAlgorithm::QuickSortSequential => "quick_sort_sequential",
        SortAlgorithm::QuickSortParallel => "quick_sort_parallel",
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TunedParams {
    /// Longest sub-range sorted inline by the parallel engine. Anything longer
    /// is worth the cost of a pool submission.
    pub concurrent_threshold: usize,
}

pub const TUNED_PARAMS: TunedParams = TunedParams {
    concurrent_threshold: 50_000,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueueCapacity {
    Bounded(usize),
    Unbounded,
}

/// Runtime settings for a parallel engine and the pool it owns.
#[derive(Clone, Copy, Debug)]
pub struct ParallelConfig {
    pub concurrent_threshold: usize,
    pub worker_count: usize,
    pub queue_capacity: QueueCapacity,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            concurrent_threshold: TUNED_PARAMS.concurrent_threshold,
            worker_count: num_cpus::get().max(1),
            queue_capacity: QueueCapacity::Unbounded,
        }
    }
}

/// Sorts `data` ascending. The parallel variant runs on [`default_pool`].
pub fn sort_i32(algo: SortAlgorithm, data: &mut [i32]) {
    match algo {
        SortAlgorithm::QuickSortSequential => sequential::quick_sort(data),
        SortAlgorithm::QuickSortParallel => match default_pool() {
            Ok(pool) => ParallelQuicksort::new(pool).sort(data),
            Err(err) => {
                warn!(%err, "default pool unavailable, sorting on the calling thread");
                ParallelQuicksort::new(Arc::new(RejectingPool)).sort(data);
            }
        },
    }
}

/// Like [`sort_i32`], with the parallel variant submitting to `pool`.
pub fn sort_i32_with_pool(algo: SortAlgorithm, data: &mut [i32], pool: Arc<dyn WorkerPool>) {
    match algo {
        SortAlgorithm::QuickSortSequential => sequential::quick_sort(data),
        SortAlgorithm::QuickSortParallel => ParallelQuicksort::new(pool).sort(data),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn test_pool() -> Arc<dyn WorkerPool> {
        Arc::new(FixedPool::new(3, QueueCapacity::Unbounded).unwrap())
    }

    fn assert_sorts_like_std(data: &[i32]) {
        let engine = ParallelQuicksort::with_threshold(test_pool(), 16);
        for &algo in all_algorithms() {
            let mut expected = data.to_vec();
            expected.sort_unstable();

            let mut actual = data.to_vec();
            sort_i32(algo, &mut actual);
            assert_eq!(
                actual,
                expected,
                "algorithm={} input_len={}",
                algorithm_name(algo),
                data.len(),
            );
        }

        let mut actual = data.to_vec();
        engine.sort(&mut actual);
        let mut expected = data.to_vec();
        expected.sort_unstable();
        assert_eq!(actual, expected, "small threshold input_len={}", data.len());
    }

    #[test]
    fn algorithm_names_are_unique() {
        let mut seen = HashSet::new();
        for &algo in all_algorithms() {
            assert!(seen.insert(algorithm_name(algo)));
        }
    }

    #[test]
    fn default_config_uses_tuned_threshold() {
        let config = ParallelConfig::default();
        assert_eq!(config.concurrent_threshold, 50_000);
        assert!(config.worker_count >= 1);
        assert_eq!(config.queue_capacity, QueueCapacity::Unbounded);
    }

    #[test]
    fn edge_cases() {
        let cases = [
            vec![],
            vec![42],
            vec![1, 2, 3, 4, 5, 6],
            vec![6, 5, 4, 3, 2, 1],
            vec![7; 128],
            vec![i32::MIN, 1, i32::MAX, 0, i32::MAX - 1, -2],
            vec![5, 5, 3, 3, 1, 1, 4, 4, 2, 2, 0, 0],
        ];

        for case in &cases {
            assert_sorts_like_std(case);
        }
    }

    #[test]
    fn fixed_seed_random_cases() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        for &size in &[2_usize, 3, 8, 31, 32, 63, 64, 127, 128, 511, 2048, 65_536] {
            let mut data = Vec::with_capacity(size);
            for _ in 0..size {
                data.push(rng.random::<i32>());
            }
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn fixed_seed_many_duplicates() {
        let mut rng = StdRng::seed_from_u64(0xD0D1_2026);
        for &size in &[64_usize, 1024, 4096] {
            let mut data = Vec::with_capacity(size);
            for _ in 0..size {
                data.push((rng.random::<i32>() % 16) * 17);
            }
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn injected_pool_is_used() {
        let pool = test_pool();
        let mut data: Vec<i32> = (0..120_000).rev().collect();
        sort_i32_with_pool(SortAlgorithm::QuickSortParallel, &mut data, pool);
        assert!(is_sorted_non_decreasing(&data));
    }
}
