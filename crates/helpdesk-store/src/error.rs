//! Error types for the storage layer.

use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record was not found.
    #[error("record not found")]
    NotFound,

    /// A record that must be unique already exists.
    #[error("record already exists")]
    AlreadyExists,

    /// The stored version differs from the one the writer read.
    ///
    /// `None` means "no record"; a writer expecting `None` lost a create race.
    #[error("version conflict: expected {expected:?}, found {found:?}")]
    VersionConflict {
        /// The version the writer based its change on.
        expected: Option<u64>,
        /// The version currently stored.
        found: Option<u64>,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
