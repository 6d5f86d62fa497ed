//! In-memory job store keyed by owner.
//!
//! One `RwLock` guards the whole owner/job map, so every mutation is
//! atomic with respect to readers: a record is never observed with
//! `result`/`error` half-written relative to `status`. Individual
//! records are mutated only by the single executor task that owns the
//! job, so there is no cross-job write contention beyond the map lock.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;

use forkcast_core::error::CoreError;
use forkcast_core::job::{JobRecord, JobStatus};
use forkcast_core::types::{JobId, OwnerId};

/// Length of generated owner ids (UUID v4 prefix).
const OWNER_ID_LEN: usize = 8;

/// Per-status tallies across all owners, plus totals. Used by `/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total_users: usize,
    pub total_jobs: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Owner-keyed map of job records.
///
/// The store exclusively owns every [`JobRecord`]; callers get clones
/// and mutate through [`update`](Self::update).
pub struct JobStore {
    inner: RwLock<HashMap<OwnerId, HashMap<JobId, JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Create a pending record for a submitted URL.
    ///
    /// When `owner_id` is absent or unknown a fresh short id is
    /// allocated, so a stale or mistyped owner id can never attach jobs
    /// to someone else's history.
    pub async fn create(&self, owner_id: Option<&str>, source_url: &str) -> JobRecord {
        let mut map = self.inner.write().await;

        let owner = match owner_id {
            Some(id) if map.contains_key(id) => id.to_string(),
            _ => {
                let new_id: String = uuid::Uuid::new_v4().to_string()[..OWNER_ID_LEN].to_string();
                map.entry(new_id.clone()).or_default();
                new_id
            }
        };

        let job_id = uuid::Uuid::new_v4().to_string();
        let record = JobRecord::new(job_id.clone(), owner.clone(), source_url);

        map.entry(owner)
            .or_default()
            .insert(job_id, record.clone());

        record
    }

    /// Fetch one record by owner and job id.
    pub async fn get(&self, owner_id: &str, job_id: &str) -> Result<JobRecord, CoreError> {
        let map = self.inner.read().await;
        let jobs = map.get(owner_id).ok_or(CoreError::NotFound {
            entity: "Owner",
            id: owner_id.to_string(),
        })?;
        jobs.get(job_id).cloned().ok_or(CoreError::NotFound {
            entity: "Job",
            id: job_id.to_string(),
        })
    }

    /// Apply a mutation to one record under the write lock.
    ///
    /// The executor funnels every status/progress transition through
    /// here, so readers always see a consistent record.
    pub async fn update<F>(&self, owner_id: &str, job_id: &str, mutate: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut map = self.inner.write().await;
        let record = map
            .get_mut(owner_id)
            .and_then(|jobs| jobs.get_mut(job_id))
            .ok_or(CoreError::NotFound {
                entity: "Job",
                id: job_id.to_string(),
            })?;
        mutate(record);
        Ok(())
    }

    /// List an owner's jobs, newest first by `created_at`.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<JobRecord>, CoreError> {
        let map = self.inner.read().await;
        let jobs = map.get(owner_id).ok_or(CoreError::NotFound {
            entity: "Owner",
            id: owner_id.to_string(),
        })?;

        let mut records: Vec<JobRecord> = jobs.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// Delete one terminal record.
    ///
    /// In-flight jobs (`Pending`/`Processing`) are not deletable; the
    /// executor still holds a reference to them.
    pub async fn delete(&self, owner_id: &str, job_id: &str) -> Result<(), CoreError> {
        let mut map = self.inner.write().await;
        let jobs = map.get_mut(owner_id).ok_or(CoreError::NotFound {
            entity: "Owner",
            id: owner_id.to_string(),
        })?;

        let record = jobs.get(job_id).ok_or(CoreError::NotFound {
            entity: "Job",
            id: job_id.to_string(),
        })?;

        if !record.status.is_terminal() {
            return Err(CoreError::Conflict(
                "Cannot delete a job that is still being processed".to_string(),
            ));
        }

        jobs.remove(job_id);
        Ok(())
    }

    /// Bulk-delete an owner's terminal jobs (completed and failed).
    ///
    /// In-flight jobs are never touched. Returns `(deleted, remaining)`.
    /// This is also the manual retention hook -- the store applies no
    /// automatic eviction.
    pub async fn clear(&self, owner_id: &str) -> Result<(usize, usize), CoreError> {
        let mut map = self.inner.write().await;
        let jobs = map.get_mut(owner_id).ok_or(CoreError::NotFound {
            entity: "Owner",
            id: owner_id.to_string(),
        })?;

        let before = jobs.len();
        jobs.retain(|_, record| !record.status.is_terminal());
        let remaining = jobs.len();

        Ok((before - remaining, remaining))
    }

    /// Aggregate counters across all owners.
    pub async fn stats(&self) -> StoreStats {
        let map = self.inner.read().await;

        let mut stats = StoreStats {
            total_users: map.len(),
            total_jobs: 0,
            pending: 0,
            processing: 0,
            completed: 0,
            failed: 0,
        };

        for jobs in map.values() {
            stats.total_jobs += jobs.len();
            for record in jobs.values() {
                match record.status {
                    JobStatus::Pending => stats.pending += 1,
                    JobStatus::Processing => stats.processing += 1,
                    JobStatus::Completed => stats.completed += 1,
                    JobStatus::Failed => stats.failed += 1,
                }
            }
        }

        stats
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
