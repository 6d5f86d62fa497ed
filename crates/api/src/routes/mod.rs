pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /submit                        submit a URL (POST)
/// /job/{owner_id}/{job_id}       get one job, delete a terminal job
/// /jobs/{owner_id}               list an owner's jobs, bulk delete
/// /stats                         global service counters
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(jobs::router())
}
