//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by language model clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error("language model is not configured")]
    Disabled,
    #[error("language model returned an empty response")]
    EmptyResponse,
    #[error("language model request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("language model output is not the expected structure: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors emitted by document text extractors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0} is not a text document")]
    NotText(String),
}

/// Failures of assessment generation.
///
/// The messages are meant to be shown to the learner as-is.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("No documents found for this session.")]
    NoDocuments,
    #[error("All chapters completed! You are a master.")]
    AllChaptersComplete,
    #[error("Failed to load content for {chapter}")]
    EmptyChapter { chapter: String },
    #[error("Failed to generate assessment.")]
    Generation(#[source] LlmError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error("random source lock poisoned")]
    Poisoned,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `MistakeLedgerService` and `AnalyticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LedgerError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
