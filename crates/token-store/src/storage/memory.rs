//! In-memory storage backend
//!
//! Records live for the lifetime of the driver. Values are wiped from memory
//! when they are overwritten, deleted or dropped.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use zeroize::Zeroizing;

use super::StorageDriver;
use crate::error::Result;

/// Volatile storage backend
#[derive(Default)]
pub struct MemoryStorageDriver {
    entries: Mutex<HashMap<String, Zeroizing<String>>>,
}

impl MemoryStorageDriver {
    /// Create an empty in-memory driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    // A single insert or remove cannot leave the map half-updated, so a
    // poisoned lock still guards a consistent map.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Zeroizing<String>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MemoryStorageDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorageDriver")
            .field("entries", &self.len())
            .finish()
    }
}

impl StorageDriver for MemoryStorageDriver {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self.entries().get(key).map(|v| v.as_str().to_owned());
        debug!("Memory get {}: {}", key, if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()
            .insert(key.to_owned(), Zeroizing::new(value.to_owned()));
        debug!("Stored key in memory: {}", key);
        Ok(())
    }

    fn del(&self, key: &str) -> Result<()> {
        if self.entries().remove(key).is_some() {
            debug!("Deleted key from memory: {}", key);
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "In-memory"
    }
}
