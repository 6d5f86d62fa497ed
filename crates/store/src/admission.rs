//! Bounded-concurrency admission control for pipeline execution.
//!
//! A fixed number of slots caps how many pipelines run at once. Admission
//! is a non-blocking check-and-reserve: there is no queue, an at-capacity
//! submission is rejected immediately with a retry hint. The reserved
//! slot travels with the executor task as an RAII guard, so it is given
//! back on every exit path (success, stage failure, panic) exactly once.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use forkcast_core::error::CoreError;

/// Retry hint returned with a capacity rejection, in seconds.
pub const RETRY_AFTER_SECS: u64 = 10;

/// A reserved processing slot. Dropping it releases the slot.
#[derive(Debug)]
pub struct AdmissionSlot {
    _permit: OwnedSemaphorePermit,
}

/// Gate limiting the number of concurrently running pipelines.
pub struct AdmissionController {
    limit: usize,
    semaphore: Arc<Semaphore>,
}

impl AdmissionController {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            semaphore: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Atomically reserve a slot, or reject when at capacity.
    pub fn try_admit(&self) -> Result<AdmissionSlot, CoreError> {
        match Arc::clone(&self.semaphore).try_acquire_owned() {
            Ok(permit) => Ok(AdmissionSlot { _permit: permit }),
            Err(TryAcquireError::NoPermits) => Err(CoreError::CapacityExceeded {
                retry_after_secs: RETRY_AFTER_SECS,
            }),
            // The semaphore is never closed while the controller lives.
            Err(TryAcquireError::Closed) => {
                Err(CoreError::Internal("Admission gate closed".to_string()))
            }
        }
    }

    /// Configured maximum of concurrently running pipelines.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Slots currently held by running pipelines.
    pub fn active(&self) -> usize {
        self.limit - self.semaphore.available_permits()
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
