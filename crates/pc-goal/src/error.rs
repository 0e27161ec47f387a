// error.rs — Error types for the goal engine.

use pc_store::StoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during goal engine operations.
#[derive(Debug, Error)]
pub enum GoalError {
    /// A setup field was missing or out of range. Never reaches the store.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The record store failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    /// A progress write targeted a plan the store no longer has.
    #[error("daily plan not found: {0}")]
    PlanNotFound(Uuid),

    /// No daily plan is loaded, so there is nothing to record progress against.
    #[error("no daily plan loaded; complete profile and goal setup first")]
    NotOnboarded,

    /// The remote commission calculator failed or returned garbage.
    #[error("commission calculator error: {0}")]
    Commission(String),

    /// The config file could not be read or parsed.
    #[error("config error at {path}: {reason}")]
    Config { path: String, reason: String },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize engine data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GoalError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        GoalError::Validation {
            field,
            reason: reason.into(),
        }
    }
}
