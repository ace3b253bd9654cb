//! Signing-key identifier storage
//!
//! Key ids reference keys that live in the platform key store, so they are
//! only ever kept in durable storage.

use std::sync::Arc;

use crate::error::Result;
use crate::key::SecretKind;
use crate::scoped::ScopedStore;
use crate::settings::Settings;
use crate::storage::{KeyringItemService, SecureItemDriver, SecureItemService, StorageDriver};

/// Per-namespace storage for anonymous and biometric key ids
pub trait ContainerStorage: Send + Sync {
    fn set_anonymous_key_id(&self, namespace: &str, kid: &str) -> Result<()>;
    fn get_anonymous_key_id(&self, namespace: &str) -> Result<Option<String>>;
    fn del_anonymous_key_id(&self, namespace: &str) -> Result<()>;

    fn set_biometric_key_id(&self, namespace: &str, kid: &str) -> Result<()>;
    fn get_biometric_key_id(&self, namespace: &str) -> Result<Option<String>>;
    fn del_biometric_key_id(&self, namespace: &str) -> Result<()>;
}

/// Key ids held in a secure-item service
#[derive(Debug)]
pub struct PersistentContainerStorage {
    store: ScopedStore<SecureItemDriver>,
}

impl PersistentContainerStorage {
    /// Create a store over any secure-item service
    pub fn new(service: Arc<dyn SecureItemService>) -> Self {
        Self {
            store: ScopedStore::new(SecureItemDriver::new(service)),
        }
    }

    /// Create a store over the OS keychain, filing entries under `service_name`
    pub fn with_keychain(service_name: &str) -> Self {
        Self::new(Arc::new(KeyringItemService::new(service_name)))
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.driver().backend_name()
    }
}

impl ContainerStorage for PersistentContainerStorage {
    fn set_anonymous_key_id(&self, namespace: &str, kid: &str) -> Result<()> {
        self.store.set(namespace, SecretKind::AnonymousKeyId, kid)
    }

    fn get_anonymous_key_id(&self, namespace: &str) -> Result<Option<String>> {
        self.store.get(namespace, SecretKind::AnonymousKeyId)
    }

    fn del_anonymous_key_id(&self, namespace: &str) -> Result<()> {
        self.store.del(namespace, SecretKind::AnonymousKeyId)
    }

    fn set_biometric_key_id(&self, namespace: &str, kid: &str) -> Result<()> {
        self.store.set(namespace, SecretKind::BiometricKeyId, kid)
    }

    fn get_biometric_key_id(&self, namespace: &str) -> Result<Option<String>> {
        self.store.get(namespace, SecretKind::BiometricKeyId)
    }

    fn del_biometric_key_id(&self, namespace: &str) -> Result<()> {
        self.store.del(namespace, SecretKind::BiometricKeyId)
    }
}

/// Open the container storage for `settings`. There is no transient variant.
pub fn open_container_storage(settings: &Settings) -> Arc<dyn ContainerStorage> {
    Arc::new(PersistentContainerStorage::with_keychain(&settings.service_name))
}
