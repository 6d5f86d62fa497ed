//! Drives one admitted job through the pipeline to a terminal state.
//!
//! One detached task per job. The admission slot moves into the outer
//! task and is dropped when it finishes, so the slot is released on
//! success, on stage failure, and on panic alike. The stage sequence
//! itself runs in an inner task whose panic surfaces as a join error,
//! which the outer task records as a generic failure -- an admitted job
//! can never stay `Processing` forever.

use std::path::Path;
use std::sync::Arc;

use forkcast_core::format::format_recipe_for_display;
use forkcast_core::job::{
    state_machine, JobOutcome, JobStatus, PROGRESS_DONE, PROGRESS_EXTRACT, PROGRESS_FORMAT,
    PROGRESS_RESOLVE, PROGRESS_SETUP, PROGRESS_TRANSCRIBE, STEP_DONE, STEP_EXTRACT, STEP_FORMAT,
    STEP_RESOLVE, STEP_SETUP, STEP_TRANSCRIBE,
};
use forkcast_store::{AdmissionSlot, JobStore};

use crate::stage::{RecipeExtractor, SourcePayload, SourceResolver, StageError, Transcriber};

/// Error message recorded when a job dies to a fault no stage contract
/// anticipated.
const UNEXPECTED_FAULT_MSG: &str = "Unexpected internal error while processing the video";

/// Runs admitted jobs against the configured collaborators.
///
/// Holds only transient references to job records; the store remains
/// their exclusive owner. Cheap to clone: all fields are shared handles.
#[derive(Clone)]
pub struct PipelineExecutor {
    store: Arc<JobStore>,
    resolver: Arc<dyn SourceResolver>,
    transcriber: Arc<dyn Transcriber>,
    extractor: Arc<dyn RecipeExtractor>,
}

impl PipelineExecutor {
    pub fn new(
        store: Arc<JobStore>,
        resolver: Arc<dyn SourceResolver>,
        transcriber: Arc<dyn Transcriber>,
        extractor: Arc<dyn RecipeExtractor>,
    ) -> Self {
        Self {
            store,
            resolver,
            transcriber,
            extractor,
        }
    }

    /// Launch the pipeline for one admitted job.
    ///
    /// Returns immediately; the submitter is never blocked on stage
    /// latency. Exactly one executor task runs per job id.
    pub fn spawn(
        &self,
        owner_id: String,
        job_id: String,
        url: String,
        slot: AdmissionSlot,
    ) -> tokio::task::JoinHandle<()> {
        let executor = self.clone();

        tokio::spawn(async move {
            // Held for the whole run; dropped on every exit path.
            let _slot = slot;

            let inner = {
                let executor = executor.clone();
                let owner = owner_id.clone();
                let job = job_id.clone();
                let url = url.clone();
                tokio::spawn(async move { executor.run_stages(&owner, &job, &url).await })
            };

            match inner.await {
                Ok(Ok(outcome)) => {
                    executor.record_completed(&owner_id, &job_id, outcome).await;
                }
                Ok(Err(stage_error)) => {
                    tracing::warn!(
                        job_id = %job_id,
                        owner_id = %owner_id,
                        error = %stage_error,
                        "Job failed",
                    );
                    executor
                        .record_failed(&owner_id, &job_id, stage_error.to_string())
                        .await;
                }
                Err(join_error) => {
                    tracing::error!(
                        job_id = %job_id,
                        owner_id = %owner_id,
                        error = %join_error,
                        "Job task aborted unexpectedly",
                    );
                    executor
                        .record_failed(&owner_id, &job_id, UNEXPECTED_FAULT_MSG.to_string())
                        .await;
                }
            }
        })
    }

    /// The stage sequence: resolve, then (for videos) transcribe and
    /// extract, then format. Strictly sequential; no retries.
    async fn run_stages(
        &self,
        owner_id: &str,
        job_id: &str,
        url: &str,
    ) -> Result<JobOutcome, StageError> {
        tracing::info!(job_id = %job_id, owner_id = %owner_id, url = %url, "Starting job");

        self.set_step(owner_id, job_id, STEP_SETUP, PROGRESS_SETUP, |record| {
            transition(record, JobStatus::Processing);
        })
        .await;

        self.set_step(owner_id, job_id, STEP_RESOLVE, PROGRESS_RESOLVE, |_| {})
            .await;
        let payload = self.resolver.resolve(url).await?;

        let recipe = match payload {
            SourcePayload::MediaFile { path, metadata } => {
                self.set_step(owner_id, job_id, STEP_TRANSCRIBE, PROGRESS_TRANSCRIBE, |_| {})
                    .await;
                let transcript_result = self.transcriber.transcribe(&path).await;
                remove_media(&path).await;
                let transcript = transcript_result?;

                self.set_step(owner_id, job_id, STEP_EXTRACT, PROGRESS_EXTRACT, |_| {})
                    .await;
                self.extractor
                    .extract(&transcript, metadata.as_deref())
                    .await?
            }
            SourcePayload::ScrapedRecipe(recipe) => recipe,
        };

        self.set_step(owner_id, job_id, STEP_FORMAT, PROGRESS_FORMAT, |_| {})
            .await;
        let formatted_text = format_recipe_for_display(&recipe, Some(url));

        Ok(JobOutcome {
            recipe,
            formatted_text,
        })
    }

    /// One locked store mutation covering step label, progress, and any
    /// extra field change.
    async fn set_step<F>(&self, owner_id: &str, job_id: &str, step: &str, progress: u8, extra: F)
    where
        F: FnOnce(&mut forkcast_core::job::JobRecord),
    {
        let result = self
            .store
            .update(owner_id, job_id, |record| {
                record.current_step = step.to_string();
                record.progress = progress;
                extra(record);
            })
            .await;

        if let Err(e) = result {
            tracing::error!(job_id = %job_id, error = %e, "Could not update job step");
        }
    }

    async fn record_completed(&self, owner_id: &str, job_id: &str, outcome: JobOutcome) {
        let result = self
            .store
            .update(owner_id, job_id, |record| {
                transition(record, JobStatus::Completed);
                record.current_step = STEP_DONE.to_string();
                record.progress = PROGRESS_DONE;
                record.completed_at = Some(chrono::Utc::now());
                record.result = Some(outcome);
                record.error = None;
            })
            .await;

        match result {
            Ok(()) => tracing::info!(job_id = %job_id, owner_id = %owner_id, "Job completed"),
            Err(e) => tracing::error!(job_id = %job_id, error = %e, "Could not record completion"),
        }
    }

    async fn record_failed(&self, owner_id: &str, job_id: &str, message: String) {
        let result = self
            .store
            .update(owner_id, job_id, |record| {
                // A fault before the first stage leaves the record Pending;
                // walk it through Processing so no transition is skipped.
                if record.status == JobStatus::Pending {
                    transition(record, JobStatus::Processing);
                }
                transition(record, JobStatus::Failed);
                record.progress = 0;
                record.completed_at = Some(chrono::Utc::now());
                record.result = None;
                record.error = Some(message);
            })
            .await;

        if let Err(e) = result {
            tracing::error!(job_id = %job_id, error = %e, "Could not record failure");
        }
    }
}

/// Apply a status transition, logging (and skipping) anything the state
/// machine forbids. The executor is the only writer per job, so a
/// violation here is a bug, not a race.
fn transition(record: &mut forkcast_core::job::JobRecord, to: JobStatus) {
    match state_machine::validate_transition(record.status, to) {
        Ok(()) => record.status = to,
        Err(e) => tracing::error!(job_id = %record.job_id, error = %e, "Refused status change"),
    }
}

/// Best-effort removal of a downloaded media file.
async fn remove_media(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!(path = %path.display(), error = %e, "Media file not removed");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
