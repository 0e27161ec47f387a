// error.rs — Error types for record persistence.

use chrono::NaiveDate;
use thiserror::Error;

use crate::records::OwnerId;

/// Errors a store backend can return.
///
/// A missing record is never an error; lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize a record.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A daily plan already exists for this owner and date.
    #[error("daily plan already exists for {owner} on {date}")]
    PlanConflict { owner: OwnerId, date: NaiveDate },

    /// The key cannot be mapped onto the backend (e.g. path separators in an owner id).
    #[error("invalid record key: {0}")]
    InvalidKey(String),

    /// The backend refused or could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
