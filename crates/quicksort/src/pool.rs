//! Worker pools that execute deferred quicksort continuations.

use std::fmt;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, trace};

use crate::error::{SortError, SubmitError};
use crate::{ParallelConfig, QueueCapacity};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// One deferred recursive call: sort `range` of the slice that owns it.
///
/// `range` is relative to the slice passed to the top-level sort.
pub struct WorkItem {
    range: Range<usize>,
    task: Task,
}

impl WorkItem {
    pub(crate) fn new(range: Range<usize>, task: impl FnOnce() + Send + 'static) -> Self {
        Self {
            range,
            task: Box::new(task),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn run(self) {
        (self.task)();
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

/// Sink for work items.
///
/// **Contract:**
/// - `submit()` never blocks. A pool that cannot take the item returns it
///   inside the error.
/// - Accepted items run exactly once, on some thread of the pool.
pub trait WorkerPool: Send + Sync {
    fn submit(&self, item: WorkItem) -> Result<(), SubmitError>;

    /// Number of threads executing accepted items.
    fn worker_count(&self) -> usize;
}

/// Fixed set of long-lived threads draining a shared queue.
pub struct FixedPool {
    sender: RwLock<Option<Sender<WorkItem>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl FixedPool {
    pub fn new(worker_count: usize, capacity: QueueCapacity) -> Result<Self, SortError> {
        if worker_count == 0 {
            return Err(SortError::ZeroWorkers);
        }

        let (sender, receiver) = match capacity {
            QueueCapacity::Bounded(cap) => channel::bounded(cap),
            QueueCapacity::Unbounded => channel::unbounded(),
        };

        let mut workers = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let receiver = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("quicksort-worker-{index}"))
                .spawn(move || run_worker(index, receiver));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    // Disconnect the channel so the threads already started exit.
                    drop(sender);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(err.into());
                }
            }
        }

        debug!(worker_count, ?capacity, "started quicksort worker pool");
        Ok(Self {
            sender: RwLock::new(Some(sender)),
            workers: Mutex::new(workers),
            worker_count,
        })
    }

    pub fn from_config(config: &ParallelConfig) -> Result<Self, SortError> {
        Self::new(config.worker_count, config.queue_capacity)
    }

    /// Stops accepting work, lets the workers drain what is already queued and
    /// joins them. Later submissions are rejected with
    /// [`SubmitError::ShutDown`].
    pub fn shutdown(&self) {
        let Some(sender) = self.sender.write().take() else {
            return;
        };
        drop(sender);

        let current = thread::current().id();
        let workers = std::mem::take(&mut *self.workers.lock());
        for handle in workers {
            // The last handle to the pool may be dropped by one of its own workers.
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                error!("quicksort worker exited by panic");
            }
        }
        debug!(worker_count = self.worker_count, "quicksort worker pool shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.read().is_none()
    }
}

impl WorkerPool for FixedPool {
    fn submit(&self, item: WorkItem) -> Result<(), SubmitError> {
        let guard = self.sender.read();
        let Some(sender) = guard.as_ref() else {
            return Err(SubmitError::ShutDown(item));
        };
        let range = item.range();
        match sender.try_send(item) {
            Ok(()) => {
                trace!(?range, "queued quicksort work item");
                Ok(())
            }
            Err(TrySendError::Full(item)) => Err(SubmitError::Saturated(item)),
            Err(TrySendError::Disconnected(item)) => Err(SubmitError::ShutDown(item)),
        }
    }

    fn worker_count(&self) -> usize {
        self.worker_count
    }
}

impl Drop for FixedPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for FixedPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedPool")
            .field("worker_count", &self.worker_count)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

fn run_worker(index: usize, receiver: Receiver<WorkItem>) {
    trace!(worker = index, "quicksort worker started");
    for item in receiver.iter() {
        let range = item.range();
        if panic::catch_unwind(AssertUnwindSafe(|| item.run())).is_err() {
            error!(worker = index, ?range, "quicksort work item panicked");
        }
    }
    trace!(worker = index, "quicksort worker stopped");
}

/// Pool with no capacity at all: every submission is rejected, so callers end
/// up running everything inline.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectingPool;

impl WorkerPool for RejectingPool {
    fn submit(&self, item: WorkItem) -> Result<(), SubmitError> {
        Err(SubmitError::Saturated(item))
    }

    fn worker_count(&self) -> usize {
        0
    }
}

static DEFAULT_POOL: OnceCell<Arc<FixedPool>> = OnceCell::new();

/// Process-wide pool built from [`ParallelConfig::default`] on first use.
///
/// It lives until the process exits; code that needs a deterministic
/// lifecycle should own a [`FixedPool`] instead.
pub fn default_pool() -> Result<Arc<FixedPool>, SortError> {
    DEFAULT_POOL
        .get_or_try_init(|| FixedPool::from_config(&ParallelConfig::default()).map(Arc::new))
        .cloned()
}
