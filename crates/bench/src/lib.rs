mod report;

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use report::{COLUMNS, ResultsRow, ResultsTable, Timing};

/// Seed used for the random input of every size, so runs are comparable.
pub const RANDOM_INPUT_SEED: u64 = 1234;

/// Criterion sampling settings for one input size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimePreset {
    pub sample_size: usize,
    pub warm_up: Duration,
    pub measurement: Duration,
}

/// Larger inputs get fewer samples and longer windows.
pub fn runtime_preset(size: usize) -> RuntimePreset {
    let (sample_size, warm_up_ms, measure_ms) = match size {
        0..=10_000 => (15, 100, 200),
        10_001..=100_000 => (15, 500, 1_000),
        _ => (10, 800, 1_500),
    };
    RuntimePreset {
        sample_size,
        warm_up: Duration::from_millis(warm_up_ms),
        measurement: Duration::from_millis(measure_ms),
    }
}

pub fn apply_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, size: usize) {
    let preset = runtime_preset(size);
    group.sample_size(preset.sample_size);
    group.warm_up_time(preset.warm_up);
    group.measurement_time(preset.measurement);
}

/// Generator behind [`random_i32s`] when called with [`RANDOM_INPUT_SEED`].
pub fn default_rng() -> StdRng {
    StdRng::seed_from_u64(RANDOM_INPUT_SEED)
}

/// `len` uniformly distributed values over the whole `i32` domain.
pub fn random_i32s(len: usize, seed: u64) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<i32>()).collect()
}

/// `0, 1, .., len - 1`, saturating at `i32::MAX` for absurd lengths.
pub fn ascending_i32s(len: usize) -> Vec<i32> {
    (0..len)
        .map(|i| i32::try_from(i).unwrap_or(i32::MAX))
        .collect()
}

pub fn is_sorted(data: &[i32]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

/// Runs `sorter` on a copy of `original` and times it.
///
/// The result only counts when the sorter returned normally and left the copy
/// ascending; otherwise the cell is reported as failed.
pub fn time_sort<F>(original: &[i32], sorter: F) -> Timing
where
    F: FnOnce(&mut [i32]),
{
    let mut data = original.to_vec();
    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| sorter(&mut data)));
    let elapsed = start.elapsed();

    match outcome {
        Err(_) => Timing::Failed("sorter panicked"),
        Ok(()) if !is_sorted(&data) => Timing::Failed("result is not sorted"),
        Ok(()) => Timing::Completed(elapsed),
    }
}
