//! The recipe-extraction pipeline: stage contracts, the external
//! collaborators that implement them, and the executor that drives one
//! admitted job through download, transcription, extraction, and
//! formatting to a terminal state.

pub mod download;
pub mod executor;
pub mod extract;
pub mod resolver;
pub mod scrape;
pub mod stage;
pub mod transcribe;

pub use executor::PipelineExecutor;
pub use stage::{RecipeExtractor, SourcePayload, SourceResolver, StageError, Transcriber};
