//! Per-sort completion barrier.
//!
//! Recursive continuations may run on pool threads long after the call that
//! scheduled them returned, so a top-level sort cannot rely on its own call
//! stack to know when the slice is done. Every outstanding piece of work holds
//! a [`Pending`] token; the sort blocks in [`Completion::wait`] until all tokens
//! for that sort are gone.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
pub(crate) struct Completion {
    outstanding: AtomicUsize,
    panicked: AtomicBool,
    lock: Mutex<()>,
    idle: Condvar,
}

impl Completion {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of outstanding work.
    pub(crate) fn enter(self: &Arc<Self>) -> Pending {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        Pending {
            completion: Arc::clone(self),
        }
    }

    /// Blocks until every [`Pending`] token handed out has been dropped.
    pub(crate) fn wait(&self) {
        let mut guard = self.lock.lock();
        while self.outstanding.load(Ordering::Acquire) != 0 {
            self.idle.wait(&mut guard);
        }
    }

    /// Whether any token was dropped while unwinding.
    pub(crate) fn panicked(&self) -> bool {
        self.panicked.load(Ordering::Acquire)
    }

    #[cfg(test)]
    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    fn leave(&self, panicking: bool) {
        if panicking {
            self.panicked.store(true, Ordering::Release);
        }
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Taking the lock orders this wake-up after a waiter's check.
            let _guard = self.lock.lock();
            self.idle.notify_all();
        }
    }
}

/// Token for one outstanding unit of work. Dropping it, normally or while
/// unwinding, releases the unit.
#[derive(Debug)]
pub(crate) struct Pending {
    completion: Arc<Completion>,
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.completion.leave(std::thread::panicking());
    }
}
