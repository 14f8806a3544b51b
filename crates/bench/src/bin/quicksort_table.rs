//! Times sequential and parallel quicksort on sorted and random inputs and
//! prints a summary table.

use clap::Parser;
use quicksort::{ParallelConfig, ParallelQuicksort, QueueCapacity, SortError, sequential};
use tracing::{error, info};

use bench::{
    RANDOM_INPUT_SEED, ResultsRow, ResultsTable, Timing, ascending_i32s, random_i32s, time_sort,
};

const DEFAULT_SIZES: [usize; 4] = [10_000, 100_000, 1_000_000, 10_000_000];
const HUGE_SIZE: usize = 100_000_000;

#[derive(Debug, Parser)]
#[command(about = "Compare sequential and parallel quicksort")]
struct Args {
    /// Array sizes to measure.
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_SIZES)]
    sizes: Vec<usize>,

    /// Also measure 100M elements (needs several GiB of memory).
    #[arg(long)]
    huge: bool,

    /// Sub-ranges longer than this are handed to the pool.
    #[arg(long)]
    threshold: Option<usize>,

    /// Worker threads per pool; defaults to the number of CPUs.
    #[arg(long)]
    workers: Option<usize>,

    /// Bound on queued work items; unbounded when omitted.
    #[arg(long)]
    queue_capacity: Option<usize>,
}

impl Args {
    fn parallel_config(&self) -> ParallelConfig {
        let defaults = ParallelConfig::default();
        ParallelConfig {
            concurrent_threshold: self.threshold.unwrap_or(defaults.concurrent_threshold),
            worker_count: self.workers.unwrap_or(defaults.worker_count),
            queue_capacity: self
                .queue_capacity
                .map_or(QueueCapacity::Unbounded, QueueCapacity::Bounded),
        }
    }
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!(%err, "benchmark aborted");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SortError> {
    let config = args.parallel_config();
    let mut sizes = args.sizes.clone();
    if args.huge {
        sizes.push(HUGE_SIZE);
    }
    info!(?config, ?sizes, "starting quicksort comparison");

    let mut table = ResultsTable::new();
    for size in sizes {
        let random = random_i32s(size, RANDOM_INPUT_SEED);
        let sorted = ascending_i32s(size);

        let cells = [
            measure("sequential", "sorted", &sorted, None)?,
            measure("parallel", "sorted", &sorted, Some(&config))?,
            measure("sequential", "random", &random, None)?,
            measure("parallel", "random", &random, Some(&config))?,
        ];
        table.push(ResultsRow { size, cells });
    }

    println!("{table}");
    Ok(())
}

/// Each parallel measurement gets a fresh pool so runs do not share warm
/// workers or leftover queue state.
fn measure(
    variant: &str,
    input: &str,
    data: &[i32],
    parallel: Option<&ParallelConfig>,
) -> Result<Timing, SortError> {
    let timing = match parallel {
        None => time_sort(data, sequential::quick_sort),
        Some(config) => {
            let engine = ParallelQuicksort::from_config(config)?;
            time_sort(data, |data| engine.sort(data))
        }
    };

    match timing {
        Timing::Completed(elapsed) => {
            info!(variant, input, size = data.len(), ?elapsed, "sorted");
        }
        Timing::Failed(reason) => {
            error!(variant, input, size = data.len(), reason, "sort failed");
        }
    }
    Ok(timing)
}
