//! Storage backends for namespaced secrets
//!
//! This module provides two storage backends:
//! 1. In-memory (volatile, process lifetime)
//! 2. Secure items (durable, OS keychain or any other [`SecureItemService`])

mod item;
mod keychain;
mod memory;
mod secure;
mod traits;

pub use item::{
    ItemLookup, ItemStatus, OsStatus, SecureItemService, STATUS_DUPLICATE_ITEM,
    STATUS_ITEM_NOT_FOUND, STATUS_SUCCESS,
};
pub use keychain::{status as keyring_status, KeyringItemService, DEFAULT_SERVICE_NAME};
pub use memory::MemoryStorageDriver;
pub use secure::SecureItemDriver;
pub use traits::StorageDriver;
