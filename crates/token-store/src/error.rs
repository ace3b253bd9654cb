//! Error types for token-store

use thiserror::Error;

use crate::storage::OsStatus;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
///
/// Absence of a record is never an error: reads return `None` and deletes of
/// missing records succeed.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A secure-item primitive reported a status other than success or
    /// "item not found".
    #[error("Secure storage failed with native status {0}")]
    NativeStatus(OsStatus),

    /// The secure item for `key` holds bytes that are not UTF-8. Only UTF-8 is
    /// ever written, so this means the item was written by someone else.
    #[error("Secure item {key} does not contain UTF-8 data")]
    InvalidEncoding {
        key: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl StorageError {
    /// Native status code carried by the error, if it came from the OS service
    pub fn native_status(&self) -> Option<OsStatus> {
        match self {
            StorageError::NativeStatus(code) => Some(*code),
            _ => None,
        }
    }
}
