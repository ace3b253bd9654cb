//! # token-store
//!
//! Client-side secret storage for an authentication SDK:
//! - Refresh tokens and signing-key ids scoped per namespace
//! - In-memory (transient) and OS keychain (persistent) backends
//! - Keychain status codes normalized into [`StorageError`]

pub mod container;
pub mod error;
pub mod key;
mod scoped;
pub mod settings;
pub mod storage;
pub mod token;

#[cfg(test)]
mod test_utils;

pub use container::{open_container_storage, ContainerStorage, PersistentContainerStorage};
pub use error::{Result, StorageError};
pub use key::{KeyDeriver, SecretKind};
pub use settings::{Settings, SettingsManager, StorageKind};
pub use storage::{
    ItemLookup, ItemStatus, KeyringItemService, MemoryStorageDriver, OsStatus, SecureItemDriver,
    SecureItemService, StorageDriver,
};
pub use token::{open_token_storage, PersistentTokenStorage, TokenStorage, TransientTokenStorage};
