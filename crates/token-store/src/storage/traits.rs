//! Storage trait definitions

use crate::error::Result;

/// Trait for key/value backends addressed by derived keys
pub trait StorageDriver: Send + Sync {
    /// Retrieve the value stored under `key`, `None` if there is none
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    fn del(&self, key: &str) -> Result<()>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
