#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server busy: all processing slots are in use, retry in {retry_after_secs}s")]
    CapacityExceeded { retry_after_secs: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}
