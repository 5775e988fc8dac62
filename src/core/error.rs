//! Error types for queue and data-utility operations.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by the task queue itself.
///
/// Task failures are never represented here: whatever a task returns is
/// handed back to its caller untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was constructed with a non-positive concurrency limit.
    #[error("invalid concurrency limit: {0}")]
    InvalidLimit(usize),
    /// A caller gave up waiting for admission.
    #[error("admission timed out after {0:?}")]
    AdmissionTimeout(Duration),
    /// Queue configuration was rejected before any queue was built.
    #[error("invalid queue configuration: {0}")]
    InvalidConfig(String),
}

/// Errors produced while loading translation tables.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// A source table could not be fetched or read.
    #[error("translation source `{table}` unavailable: {reason}")]
    Source {
        /// Name of the table that failed (e.g. `text`).
        table: String,
        /// Backend-specific reason.
        reason: String,
    },
    /// A source table was fetched but its rows did not parse.
    #[error("translation source `{table}` malformed: {source}")]
    Malformed {
        /// Name of the table that failed.
        table: String,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
