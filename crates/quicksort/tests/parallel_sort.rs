use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use quicksort::{
    FixedPool, ParallelConfig, ParallelQuicksort, QueueCapacity, RejectingPool, SortAlgorithm,
    WorkerPool, default_pool, is_sorted_non_decreasing, sequential, sort_i32,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_data(seed: u64, len: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<i32>()).collect()
}

fn histogram(data: &[i32]) -> HashMap<i32, usize> {
    let mut counts = HashMap::new();
    for &x in data {
        *counts.entry(x).or_insert(0) += 1;
    }
    counts
}

fn pool(workers: usize, capacity: QueueCapacity) -> Arc<dyn WorkerPool> {
    Arc::new(FixedPool::new(workers, capacity).unwrap())
}

#[test]
fn preserves_multiset() {
    let engine = ParallelQuicksort::with_threshold(pool(4, QueueCapacity::Unbounded), 512);
    let mut rng = StdRng::seed_from_u64(0xBA5E_0001);
    let original: Vec<i32> = (0..200_000).map(|_| rng.random_range(-1_000..1_000)).collect();

    let mut data = original.clone();
    engine.sort(&mut data);

    assert!(is_sorted_non_decreasing(&data));
    assert_eq!(histogram(&data), histogram(&original));
}

#[test]
fn sorting_twice_changes_nothing() {
    let engine = ParallelQuicksort::with_threshold(pool(2, QueueCapacity::Unbounded), 1_000);
    let mut once = random_data(11, 150_000);
    engine.sort(&mut once);

    let mut twice = once.clone();
    engine.sort(&mut twice);
    assert_eq!(once, twice);
}

#[test]
fn zero_capacity_pool_sorts_inline() {
    let engine = ParallelQuicksort::with_threshold(Arc::new(RejectingPool), 1);
    let mut data = random_data(12, 100_000);
    let mut expected = data.clone();
    expected.sort_unstable();

    engine.sort(&mut data);
    assert_eq!(data, expected);
}

#[test]
fn tiny_queue_saturates_without_losing_work() {
    let engine = ParallelQuicksort::with_threshold(pool(2, QueueCapacity::Bounded(1)), 64);
    let mut data = random_data(13, 300_000);
    let mut expected = data.clone();
    expected.sort_unstable();

    engine.sort(&mut data);
    assert_eq!(data, expected);
}

#[test]
fn pool_is_reusable_across_sorts() {
    let engine = ParallelQuicksort::with_threshold(pool(3, QueueCapacity::Unbounded), 2_000);
    for seed in 0..5 {
        let mut data = random_data(seed, 120_000);
        engine.sort(&mut data);
        assert!(is_sorted_non_decreasing(&data), "seed={seed}");
    }
}

#[test]
fn concurrent_sorts_share_one_pool() {
    let engine = ParallelQuicksort::with_threshold(pool(4, QueueCapacity::Unbounded), 1_000);

    thread::scope(|scope| {
        for seed in 0..4_u64 {
            let engine = engine.clone();
            scope.spawn(move || {
                let mut data = random_data(100 + seed, 200_000);
                engine.sort(&mut data);
                assert!(is_sorted_non_decreasing(&data), "seed={seed}");
            });
        }
    });
}

#[test]
fn matches_sequential_on_sorted_and_reversed() {
    let engine = ParallelQuicksort::with_threshold(pool(4, QueueCapacity::Unbounded), 4_096);
    let ascending: Vec<i32> = (0..250_000).collect();
    let descending: Vec<i32> = (0..250_000).rev().collect();

    for original in [ascending, descending] {
        let mut parallel = original.clone();
        engine.sort(&mut parallel);
        let mut baseline = original;
        sequential::quick_sort(&mut baseline);
        assert_eq!(parallel, baseline);
    }
}

#[test]
fn sort_range_leaves_outside_untouched() {
    let engine = ParallelQuicksort::with_threshold(pool(2, QueueCapacity::Unbounded), 100);
    let mut data = random_data(14, 10_000);
    let before = data.clone();

    engine.sort_range(&mut data, 1_000, 8_999).unwrap();

    assert_eq!(data[..1_000], before[..1_000]);
    assert_eq!(data[9_000..], before[9_000..]);
    assert!(is_sorted_non_decreasing(&data[1_000..9_000]));
}

#[test]
fn owned_engine_from_config() {
    let config = ParallelConfig {
        concurrent_threshold: 10_000,
        worker_count: 2,
        queue_capacity: QueueCapacity::Bounded(16),
    };
    let engine = ParallelQuicksort::from_config(&config).unwrap();
    assert_eq!(engine.pool().worker_count(), 2);
    assert_eq!(engine.concurrent_threshold(), 10_000);

    let mut data = random_data(15, 100_000);
    engine.sort(&mut data);
    assert!(is_sorted_non_decreasing(&data));
}

#[test]
fn default_entry_point_on_identical_values() {
    let mut data = vec![1_234; 100_000];
    sort_i32(SortAlgorithm::QuickSortParallel, &mut data);
    assert!(data.iter().all(|&x| x == 1_234));
    assert!(default_pool().unwrap().worker_count() >= 1);
}
