//! Core error types for focusroom-core.
//!
//! Every failure the session state machine can report is recoverable: the
//! host surfaces it to the user and keeps going.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionState;

/// Core error type for focusroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before any state was touched
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operation is not permitted from the current session state
    #[error("Cannot {operation} while session is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: SessionState,
    },

    /// Feedback was already recorded for the bound task
    #[error("Feedback already recorded for task '{task}'")]
    AlreadyFeedback { task: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The session actor has shut down
    #[error("Session actor is no longer running")]
    ActorClosed,
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task name must not be empty")]
    EmptyTaskName,

    #[error("Duration '{field}' must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("Unknown rating '{0}' (expected very_good, good, neutral, bad, very_bad or 1-5)")]
    UnknownRating(String),

    #[error("Unknown suggestion input '{0}' (expected minutes like 25m or a complexity label)")]
    UnknownSuggestionInput(String),

    #[error("Invalid duration '{0}' (expected e.g. 90s, 25m or 25)")]
    InvalidDuration(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl CoreError {
    pub(crate) fn invalid_transition(operation: &'static str, state: SessionState) -> Self {
        CoreError::InvalidTransition { operation, state }
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for CoreError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        CoreError::ActorClosed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for CoreError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        CoreError::ActorClosed
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Stage;

    #[test]
    fn invalid_transition_message_names_operation_and_state() {
        let err = CoreError::invalid_transition("start", SessionState::StageRunning(Stage::Focus));
        assert_eq!(err.to_string(), "Cannot start while session is running (focus)");
    }

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::EmptyTaskName.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyTaskName)));
        assert_eq!(err.to_string(), "Task name must not be empty");
    }
}
