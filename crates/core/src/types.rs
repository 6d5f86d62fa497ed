/// Job identifiers are UUID v4 strings, generated at submission.
pub type JobId = String;

/// Owner identifiers are short (8-char) opaque strings grouping jobs
/// by submitting user or session.
pub type OwnerId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
