use std::sync::Arc;

use forkcast_pipeline::PipelineExecutor;
use forkcast_store::{AdmissionController, JobStore};

use crate::config::ServiceConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Owner-keyed in-memory job store.
    pub store: Arc<JobStore>,
    /// Bounded-concurrency gate for pipeline execution.
    pub admission: Arc<AdmissionController>,
    /// Executor driving admitted jobs to a terminal state.
    pub executor: Arc<PipelineExecutor>,
    /// Service configuration.
    pub config: Arc<ServiceConfig>,
}
