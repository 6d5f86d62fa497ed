//! Route definitions for job submission and tracking.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted under `/api/v1`.
///
/// ```text
/// POST   /submit                      -> submit
/// GET    /job/{owner_id}/{job_id}     -> get_job
/// DELETE /job/{owner_id}/{job_id}     -> delete_job
/// GET    /jobs/{owner_id}             -> list_jobs
/// DELETE /jobs/{owner_id}             -> clear_jobs
/// GET    /stats                       -> get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(jobs::submit))
        .route(
            "/job/{owner_id}/{job_id}",
            get(jobs::get_job).delete(jobs::delete_job),
        )
        .route(
            "/jobs/{owner_id}",
            get(jobs::list_jobs).delete(jobs::clear_jobs),
        )
        .route("/stats", get(jobs::get_stats))
}
