//! Job record, status enum, and the forward-only state machine.
//!
//! A job tracks one submitted URL from admission to a terminal outcome.
//! Status only ever moves `Pending -> Processing -> {Completed, Failed}`;
//! terminal records are immutable until deleted.

use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;
use crate::types::{JobId, OwnerId, Timestamp};

// ---------------------------------------------------------------------------
// Progress milestones and step labels
// ---------------------------------------------------------------------------

/// Progress right after the job transitions to `Processing`.
pub const PROGRESS_SETUP: u8 = 10;
/// Progress while the source URL is being downloaded or scraped.
pub const PROGRESS_RESOLVE: u8 = 20;
/// Progress during audio transcription.
pub const PROGRESS_TRANSCRIBE: u8 = 40;
/// Progress during LLM recipe extraction.
pub const PROGRESS_EXTRACT: u8 = 70;
/// Progress while the display text is being produced.
pub const PROGRESS_FORMAT: u8 = 80;
/// Progress of a completed job.
pub const PROGRESS_DONE: u8 = 100;

/// Step label for a job waiting to start.
pub const STEP_WAITING: &str = "Waiting...";
/// Step label while configuration is applied.
pub const STEP_SETUP: &str = "Preparing...";
/// Step label while the video is downloaded or the site scraped.
pub const STEP_RESOLVE: &str = "Downloading video...";
/// Step label during transcription.
pub const STEP_TRANSCRIBE: &str = "Transcribing audio...";
/// Step label during LLM extraction.
pub const STEP_EXTRACT: &str = "Extracting recipe...";
/// Step label while formatting the result.
pub const STEP_FORMAT: &str = "Formatting recipe...";
/// Step label of a finished job.
pub const STEP_DONE: &str = "Done";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Lowercase wire name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

pub mod state_machine {
    use super::JobStatus;

    /// Returns the set of valid target statuses reachable from `from`.
    ///
    /// Terminal states return an empty slice because no further
    /// transitions are allowed.
    pub fn valid_transitions(from: JobStatus) -> &'static [JobStatus] {
        match from {
            JobStatus::Pending => &[JobStatus::Processing],
            JobStatus::Processing => &[JobStatus::Completed, JobStatus::Failed],
            JobStatus::Completed | JobStatus::Failed => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: JobStatus, to: JobStatus) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: JobStatus, to: JobStatus) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            Err(format!(
                "Invalid transition: {} -> {}",
                from.as_str(),
                to.as_str()
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Job record
// ---------------------------------------------------------------------------

/// Result payload of a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    /// The structured recipe produced by the pipeline.
    pub recipe: Recipe,
    /// Display text ready for the shortcut client.
    pub formatted_text: String,
}

/// One tracked unit of work, from URL submission to terminal outcome.
///
/// `result` is present only when `status` is `Completed`; `error` only
/// when `Failed`. Neither is set while the job is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub owner_id: OwnerId,
    pub status: JobStatus,
    /// Human-readable label of the stage in progress. Display only.
    pub current_step: String,
    /// 0-100, monotonic within a run, reset to 0 on failure.
    pub progress: u8,
    pub source_url: String,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub result: Option<JobOutcome>,
    pub error: Option<String>,
}

impl JobRecord {
    /// Create a fresh pending record for a newly submitted URL.
    pub fn new(job_id: JobId, owner_id: OwnerId, source_url: &str) -> Self {
        Self {
            job_id,
            owner_id,
            status: JobStatus::Pending,
            current_step: STEP_WAITING.to_string(),
            progress: 0,
            source_url: source_url.to_string(),
            created_at: chrono::Utc::now(),
            completed_at: None,
            result: None,
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::state_machine::*;
    use super::*;

    // -- valid transitions ----------------------------------------------------

    #[test]
    fn pending_to_processing() {
        assert!(can_transition(JobStatus::Pending, JobStatus::Processing));
    }

    #[test]
    fn processing_to_completed() {
        assert!(can_transition(JobStatus::Processing, JobStatus::Completed));
    }

    #[test]
    fn processing_to_failed() {
        assert!(can_transition(JobStatus::Processing, JobStatus::Failed));
    }

    // -- terminal states have no outgoing transitions ------------------------

    #[test]
    fn completed_has_no_transitions() {
        assert!(valid_transitions(JobStatus::Completed).is_empty());
    }

    #[test]
    fn failed_has_no_transitions() {
        assert!(valid_transitions(JobStatus::Failed).is_empty());
    }

    // -- invalid transitions --------------------------------------------------

    #[test]
    fn pending_to_completed_invalid() {
        assert!(!can_transition(JobStatus::Pending, JobStatus::Completed));
    }

    #[test]
    fn pending_to_failed_invalid() {
        assert!(!can_transition(JobStatus::Pending, JobStatus::Failed));
    }

    #[test]
    fn failed_to_processing_invalid() {
        assert!(!can_transition(JobStatus::Failed, JobStatus::Processing));
    }

    #[test]
    fn completed_to_pending_invalid() {
        assert!(!can_transition(JobStatus::Completed, JobStatus::Pending));
    }

    // -- validate_transition returns descriptive error ------------------------

    #[test]
    fn validate_transition_ok() {
        assert!(validate_transition(JobStatus::Pending, JobStatus::Processing).is_ok());
    }

    #[test]
    fn validate_transition_err() {
        let err = validate_transition(JobStatus::Completed, JobStatus::Processing).unwrap_err();
        assert!(err.contains("completed"));
        assert!(err.contains("processing"));
    }

    // -- status helpers --------------------------------------------------------

    #[test]
    fn terminal_statuses() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
    }

    // -- record construction ---------------------------------------------------

    #[test]
    fn new_record_is_pending_with_zero_progress() {
        let record = JobRecord::new(
            "job-1".into(),
            "owner-1".into(),
            "https://www.tiktok.com/@cook/video/1",
        );
        assert_eq!(record.status, JobStatus::Pending);
        assert_eq!(record.progress, 0);
        assert_eq!(record.current_step, STEP_WAITING);
        assert!(record.completed_at.is_none());
        assert!(record.result.is_none());
        assert!(record.error.is_none());
    }
}
