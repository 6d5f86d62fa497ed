//! Handlers for job submission, polling, and cleanup.
//!
//! `submit` is the only handler with side effects beyond the store: it
//! reserves an admission slot, creates the record, and launches the
//! executor task. Everything else is a read or delete against the store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use forkcast_core::job::JobRecord;
use forkcast_core::sources::validate_submit_url;
use forkcast_core::types::{JobId, OwnerId, Timestamp};

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for POST /submit.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// URL of the video or recipe page to process.
    pub url: String,
    /// Optional owner id grouping this job with earlier ones.
    pub owner_id: Option<String>,
}

/// Response for POST /submit.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub job_id: JobId,
    pub owner_id: OwnerId,
    pub status: &'static str,
    pub message: &'static str,
    pub created_at: Timestamp,
}

/// Response for GET /jobs/{owner_id}.
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub owner_id: OwnerId,
    pub total_jobs: usize,
    pub jobs: Vec<JobRecord>,
}

/// Response for DELETE /job/{owner_id}/{job_id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub job_id: JobId,
}

/// Query parameters for DELETE /jobs/{owner_id}.
#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    /// Accepted for client compatibility. Failed jobs are terminal
    /// history too, so either setting removes them along with the
    /// completed ones.
    pub completed_only: Option<bool>,
}

/// Response for DELETE /jobs/{owner_id}.
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub owner_id: OwnerId,
    pub deleted: usize,
    pub remaining_jobs: usize,
}

/// Per-status job tallies across all owners.
#[derive(Debug, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Response for GET /stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub active_jobs: usize,
    pub max_concurrent_jobs: usize,
    pub available_slots: usize,
    pub total_users: usize,
    pub total_jobs: usize,
    pub jobs_by_status: StatusCounts,
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/submit
///
/// Submit a URL for processing. Returns 201 with the job and owner ids
/// immediately; the pipeline runs in the background and is observed by
/// polling. Returns 503 with a retry hint when all processing slots are
/// taken -- no record is created in that case.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<impl IntoResponse> {
    validate_submit_url(&input.url)?;

    // Reserve the slot before touching the store: a rejected submission
    // must leave no trace.
    let slot = state.admission.try_admit()?;

    let record = state.store.create(input.owner_id.as_deref(), &input.url).await;

    tracing::info!(
        job_id = %record.job_id,
        owner_id = %record.owner_id,
        url = %record.source_url,
        "Job submitted",
    );

    // Detached: the submitter never waits on the pipeline.
    let _task = state.executor.spawn(
        record.owner_id.clone(),
        record.job_id.clone(),
        record.source_url.clone(),
        slot,
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            job_id: record.job_id,
            owner_id: record.owner_id,
            status: "pending",
            message: "Processing started",
            created_at: record.created_at,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/job/{owner_id}/{job_id}
///
/// Full record of a single job, including result or error once terminal.
pub async fn get_job(
    State(state): State<AppState>,
    Path((owner_id, job_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let record = state.store.get(&owner_id, &job_id).await?;
    Ok(Json(record))
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{owner_id}
///
/// All of an owner's jobs, newest first.
pub async fn list_jobs(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let jobs = state.store.list(&owner_id).await?;

    Ok(Json(JobListResponse {
        owner_id,
        total_jobs: jobs.len(),
        jobs,
    }))
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// DELETE /api/v1/job/{owner_id}/{job_id}
///
/// Delete a terminal job. Returns 409 while the job is still pending or
/// processing.
pub async fn delete_job(
    State(state): State<AppState>,
    Path((owner_id, job_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    state.store.delete(&owner_id, &job_id).await?;

    tracing::info!(job_id = %job_id, owner_id = %owner_id, "Job deleted");

    Ok(Json(DeleteResponse {
        message: "Job deleted",
        job_id,
    }))
}

/// DELETE /api/v1/jobs/{owner_id}?completed_only=bool
///
/// Bulk-delete an owner's terminal jobs (completed and failed alike).
/// In-flight jobs are never touched.
pub async fn clear_jobs(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Query(query): Query<ClearQuery>,
) -> AppResult<impl IntoResponse> {
    let (deleted, remaining) = state.store.clear(&owner_id).await?;

    tracing::info!(
        owner_id = %owner_id,
        deleted,
        completed_only = query.completed_only.unwrap_or(true),
        "Jobs cleared",
    );

    Ok(Json(ClearResponse {
        message: format!("{deleted} job(s) deleted"),
        owner_id,
        deleted,
        remaining_jobs: remaining,
    }))
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// GET /api/v1/stats
///
/// Global service counters: slot usage plus per-status job tallies
/// across all owners.
pub async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let store_stats = state.store.stats().await;

    Ok(Json(StatsResponse {
        active_jobs: state.admission.active(),
        max_concurrent_jobs: state.admission.limit(),
        available_slots: state.admission.available(),
        total_users: store_stats.total_users,
        total_jobs: store_stats.total_jobs,
        jobs_by_status: StatusCounts {
            pending: store_stats.pending,
            processing: store_stats.processing,
            completed: store_stats.completed,
            failed: store_stats.failed,
        },
    }))
}
