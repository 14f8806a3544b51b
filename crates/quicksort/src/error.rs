use thiserror::Error;

use crate::pool::WorkItem;

/// Errors surfaced to callers of the sorting and pool APIs.
#[derive(Debug, Error)]
pub enum SortError {
    #[error("range {low}..={high} is out of bounds for a slice of length {len}")]
    InvalidRange { low: usize, high: usize, len: usize },

    #[error("worker pool needs at least one worker")]
    ZeroWorkers,

    #[error("failed to spawn pool worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

/// A pool refused a work item. The item is handed back so the submitter can
/// run it inline.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("worker pool queue is full")]
    Saturated(WorkItem),

    #[error("worker pool is shut down")]
    ShutDown(WorkItem),
}

impl SubmitError {
    pub fn item(&self) -> &WorkItem {
        match self {
            Self::Saturated(item) | Self::ShutDown(item) => item,
        }
    }

    pub fn into_item(self) -> WorkItem {
        match self {
            Self::Saturated(item) | Self::ShutDown(item) => item,
        }
    }
}
