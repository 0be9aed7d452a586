//! Error types for the genesis workflow engine.
//!
//! The taxonomy is deliberately small: a generation failure aborts the run
//! and is surfaced once as an `error` event, a validation failure is reported
//! without closing the connection, and a transport failure ends the run
//! silently. Nothing is retried here; retry is a gateway-level policy.

use thiserror::Error;

/// A failed call to the text-generation backend.
///
/// All backend failures (quota, network, invalid response, timeout) collapse
/// into this one type; the orchestrator never special-cases subtypes beyond
/// surfacing the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation failed: {message}")]
pub struct GenerationError {
    /// The backend-reported failure message.
    pub message: String,
}

impl GenerationError {
    /// Creates a new generation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A failed append to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("persistence write failed: {message}")]
pub struct PersistenceError {
    /// The store-reported failure message.
    pub message: String,
}

impl PersistenceError {
    /// Creates a new persistence error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A failure on the event channel between the engine and a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection backing the event channel is gone.
    #[error("event channel closed")]
    Closed,
}

/// The umbrella error for fallible engine operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The generation backend failed.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// Malformed control input (empty brief, unknown artifact type).
    #[error("validation error: {0}")]
    Validation(String),

    /// The event channel failed mid-run.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// A persistence write failed.
    #[error("{0}")]
    Persistence(#[from] PersistenceError),

    /// The run was cancelled before completing.
    #[error("run cancelled: {0}")]
    Cancelled(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_message() {
        let err = GenerationError::new("quota exceeded");
        assert_eq!(err.to_string(), "generation failed: quota exceeded");
    }

    #[test]
    fn test_workflow_error_from_generation() {
        let err: WorkflowError = GenerationError::new("backend down").into();
        assert!(matches!(err, WorkflowError::Generation(_)));
    }

    #[test]
    fn test_workflow_error_from_transport() {
        let err: WorkflowError = TransportError::Closed.into();
        assert_eq!(err.to_string(), "event channel closed");
    }

    #[test]
    fn test_validation_error_display() {
        let err = WorkflowError::Validation("brief is required".to_string());
        assert_eq!(err.to_string(), "validation error: brief is required");
    }
}
