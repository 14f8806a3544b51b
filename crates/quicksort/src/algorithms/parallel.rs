//! Fork-join quicksort over a [`WorkerPool`].
//!
//! Each call partitions its range synchronously, then looks at the two sides
//! independently: a side longer than the concurrency threshold is packaged as
//! a [`WorkItem`] and offered to the pool, everything else (and anything the
//! pool refuses) is sorted on the current thread. The two sides never
//! overlap, so the tasks mutate the shared slice without locks.
//!
//! Deferred work outlives the call that scheduled it. The top-level
//! [`ParallelQuicksort::sort`] therefore owns a [`Completion`] barrier and
//! does not return, not even by unwinding, until every item it transitively
//! created has finished.

use std::sync::Arc;

use tracing::debug;

use crate::completion::{Completion, Pending};
use crate::pool::{FixedPool, WorkItem, WorkerPool};
use crate::{ParallelConfig, SortError, TUNED_PARAMS};

use super::common;

#[derive(Clone)]
pub struct ParallelQuicksort {
    pool: Arc<dyn WorkerPool>,
    concurrent_threshold: usize,
}

impl ParallelQuicksort {
    pub fn new(pool: Arc<dyn WorkerPool>) -> Self {
        Self::with_threshold(pool, TUNED_PARAMS.concurrent_threshold)
    }

    /// `concurrent_threshold` is the largest sub-range length that is still
    /// sorted inline; longer ones go to the pool.
    pub fn with_threshold(pool: Arc<dyn WorkerPool>, concurrent_threshold: usize) -> Self {
        Self {
            pool,
            concurrent_threshold,
        }
    }

    /// Submits to `pool`; only the threshold is taken from `config`.
    pub fn with_config(pool: Arc<dyn WorkerPool>, config: &ParallelConfig) -> Self {
        Self::with_threshold(pool, config.concurrent_threshold)
    }

    /// Engine with its own freshly started [`FixedPool`], shut down once the
    /// engine and every clone of it are dropped.
    pub fn from_config(config: &ParallelConfig) -> Result<Self, SortError> {
        let pool = FixedPool::from_config(config)?;
        Ok(Self::with_config(Arc::new(pool), config))
    }

    pub fn pool(&self) -> &Arc<dyn WorkerPool> {
        &self.pool
    }

    pub fn concurrent_threshold(&self) -> usize {
        self.concurrent_threshold
    }

    /// Sorts `data[low..=high]` in place. Ranges with `low >= high` are left
    /// alone.
    pub fn sort_range(&self, data: &mut [i32], low: usize, high: usize) -> Result<(), SortError> {
        if let Some(range) = common::checked_range(data.len(), low, high)? {
            self.sort(&mut data[range]);
        }
        Ok(())
    }

    /// Sorts `data` in place and returns once every task spawned for it has
    /// finished.
    ///
    /// Must not be called from one of the pool's own workers: the caller
    /// blocks until the pool has run the work it submitted.
    ///
    /// # Panics
    ///
    /// If any task sorting part of `data` panicked. The panic is re-raised
    /// only after all other tasks for `data` are done.
    pub fn sort(&self, data: &mut [i32]) {
        if data.len() < 2 {
            return;
        }

        let completion = Completion::new();
        let join = JoinOnDrop(&completion);
        let task = Arc::new(SortTask {
            pool: Arc::clone(&self.pool),
            concurrent_threshold: self.concurrent_threshold,
            completion: Arc::clone(&completion),
        });

        {
            let _pending = completion.enter();
            task.quick_sort(data, 0);
        }

        if join.finish() {
            panic!("a parallel quicksort task panicked");
        }
    }
}

/// Blocks on the barrier when dropped, so `data` stays borrowed for as long as
/// any task may still touch it, including while unwinding.
struct JoinOnDrop<'a>(&'a Completion);

impl JoinOnDrop<'_> {
    /// Waits for the barrier and reports whether any task unwound.
    fn finish(self) -> bool {
        let completion = self.0;
        drop(self);
        completion.panicked()
    }
}

impl Drop for JoinOnDrop<'_> {
    fn drop(&mut self) {
        self.0.wait();
    }
}

struct SortTask {
    pool: Arc<dyn WorkerPool>,
    concurrent_threshold: usize,
    completion: Arc<Completion>,
}

impl SortTask {
    /// `offset` is where `data` starts inside the top-level slice.
    fn quick_sort(self: &Arc<Self>, mut data: &mut [i32], mut offset: usize) {
        while data.len() > 1 {
            let pivot = common::choose_pivot_median3(data);
            let (left_len, right_start) = common::partition_crossing(data, pivot);

            let (left, rest) = data.split_at_mut(left_len);
            let right = &mut rest[right_start - left_len..];
            let right_offset = offset + right_start;

            let left = self.offload(left, offset);
            let right = self.offload(right, right_offset);

            match (left, right) {
                (Some(left), Some(right)) => {
                    if left.len() < right.len() {
                        self.quick_sort(left, offset);
                        data = right;
                        offset = right_offset;
                    } else {
                        self.quick_sort(right, right_offset);
                        data = left;
                    }
                }
                (Some(left), None) => data = left,
                (None, Some(right)) => {
                    data = right;
                    offset = right_offset;
                }
                (None, None) => return,
            }
        }
    }

    /// Gives `data` to the pool when it is longer than the threshold. Returns
    /// it back when it has to be sorted here instead, either because it is
    /// small or because the pool refused it.
    fn offload<'a>(self: &Arc<Self>, data: &'a mut [i32], offset: usize) -> Option<&'a mut [i32]> {
        if data.len() <= self.concurrent_threshold {
            return Some(data);
        }

        match self.pool.submit(self.work_item(data, offset)) {
            Ok(()) => None,
            Err(err) => {
                debug!(%err, range = ?err.item().range(), "sorting rejected range inline");
                // Dropping the unrun item releases its barrier count.
                drop(err);
                Some(data)
            }
        }
    }

    fn work_item(self: &Arc<Self>, data: &mut [i32], offset: usize) -> WorkItem {
        let range = offset..offset + data.len();
        let region = RawRegion {
            ptr: data.as_mut_ptr(),
            len: data.len(),
        };
        let pending: Pending = self.completion.enter();
        let task = Arc::clone(self);

        WorkItem::new(range, move || {
            let _pending = pending;
            // SAFETY: `region` was carved out of the top-level slice by a
            // partition step and handed over whole; the scheduling call never
            // touches it again, no sibling range overlaps it, and the
            // top-level `sort` keeps the slice borrowed until `_pending` and
            // every token it spawns are dropped.
            let data = unsafe { region.into_slice() };
            task.quick_sort(data, offset);
        })
    }
}

/// Exclusive sub-range of the slice being sorted, moved into a work item.
struct RawRegion {
    ptr: *mut i32,
    len: usize,
}

impl RawRegion {
    /// # Safety
    ///
    /// The caller must have exclusive access to the region for `'a`.
    unsafe fn into_slice<'a>(self) -> &'a mut [i32] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

// SAFETY: a region is only ever dereferenced by the single work item that owns
// it; see `SortTask::work_item`.
unsafe impl Send for RawRegion {}
