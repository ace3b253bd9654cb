//! Refresh token storage

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::key::SecretKind;
use crate::scoped::ScopedStore;
use crate::settings::{Settings, StorageKind};
use crate::storage::{
    KeyringItemService, MemoryStorageDriver, SecureItemDriver, SecureItemService, StorageDriver,
};

/// Per-namespace refresh token storage
pub trait TokenStorage: Send + Sync {
    /// Store the refresh token for `namespace`, replacing any previous one
    fn set_refresh_token(&self, namespace: &str, token: &str) -> Result<()>;

    /// Retrieve the refresh token for `namespace`
    fn get_refresh_token(&self, namespace: &str) -> Result<Option<String>>;

    /// Remove the refresh token for `namespace`. Succeeds if there is none.
    fn del_refresh_token(&self, namespace: &str) -> Result<()>;

    /// Get a human-readable name for the backend
    fn backend_name(&self) -> &'static str;
}

/// Refresh tokens held in memory for the lifetime of this value
#[derive(Debug, Default)]
pub struct TransientTokenStorage {
    store: ScopedStore<MemoryStorageDriver>,
}

impl TransientTokenStorage {
    pub fn new() -> Self {
        Self {
            store: ScopedStore::new(MemoryStorageDriver::new()),
        }
    }
}

impl TokenStorage for TransientTokenStorage {
    fn set_refresh_token(&self, namespace: &str, token: &str) -> Result<()> {
        self.store.set(namespace, SecretKind::RefreshToken, token)
    }

    fn get_refresh_token(&self, namespace: &str) -> Result<Option<String>> {
        self.store.get(namespace, SecretKind::RefreshToken)
    }

    fn del_refresh_token(&self, namespace: &str) -> Result<()> {
        self.store.del(namespace, SecretKind::RefreshToken)
    }

    fn backend_name(&self) -> &'static str {
        self.store.driver().backend_name()
    }
}

/// Refresh tokens held in a secure-item service
#[derive(Debug)]
pub struct PersistentTokenStorage {
    store: ScopedStore<SecureItemDriver>,
}

impl PersistentTokenStorage {
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
}

impl TokenStorage for PersistentTokenStorage {
    fn set_refresh_token(&self, namespace: &str, token: &str) -> Result<()> {
        self.store.set(namespace, SecretKind::RefreshToken, token)
    }

    fn get_refresh_token(&self, namespace: &str) -> Result<Option<String>> {
        self.store.get(namespace, SecretKind::RefreshToken)
    }

    fn del_refresh_token(&self, namespace: &str) -> Result<()> {
        self.store.del(namespace, SecretKind::RefreshToken)
    }

    fn backend_name(&self) -> &'static str {
        self.store.driver().backend_name()
    }
}

/// Open the token storage selected by `settings`
pub fn open_token_storage(settings: &Settings) -> Arc<dyn TokenStorage> {
    debug!("Opening {:?} token storage", settings.storage_kind);
    match settings.storage_kind {
        StorageKind::Transient => Arc::new(TransientTokenStorage::new()),
        StorageKind::Persistent => {
            Arc::new(PersistentTokenStorage::with_keychain(&settings.service_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::test_utils::{MockItemService, Primitive};

    fn persistent() -> (PersistentTokenStorage, Arc<MockItemService>) {
        let service = Arc::new(MockItemService::new());
        (PersistentTokenStorage::new(service.clone()), service)
    }

    fn exercise_lifecycle(storage: &dyn TokenStorage) {
        storage.set_refresh_token("tenantA", "rt-123").unwrap();
        assert_eq!(
            storage.get_refresh_token("tenantA").unwrap(),
            Some("rt-123".to_string())
        );

        storage.del_refresh_token("tenantA").unwrap();
        assert_eq!(storage.get_refresh_token("tenantA").unwrap(), None);
    }

    fn exercise_isolation(storage: &dyn TokenStorage) {
        storage.set_refresh_token("A", "x").unwrap();
        storage.set_refresh_token("B", "y").unwrap();

        assert_eq!(storage.get_refresh_token("A").unwrap(), Some("x".to_string()));
        assert_eq!(storage.get_refresh_token("B").unwrap(), Some("y".to_string()));

        storage.del_refresh_token("A").unwrap();
        assert_eq!(storage.get_refresh_token("A").unwrap(), None);
        assert_eq!(storage.get_refresh_token("B").unwrap(), Some("y".to_string()));
    }

    #[test]
    fn test_transient_lifecycle() {
        exercise_lifecycle(&TransientTokenStorage::new());
    }

    #[test]
    fn test_transient_namespace_isolation() {
        exercise_isolation(&TransientTokenStorage::new());
    }

    #[test]
    fn test_persistent_lifecycle() {
        let (storage, _) = persistent();
        exercise_lifecycle(&storage);
    }

    #[test]
    fn test_persistent_namespace_isolation() {
        let (storage, _) = persistent();
        exercise_isolation(&storage);
    }

    #[test]
    fn test_persistent_uses_derived_key() {
        let (storage, service) = persistent();

        storage.set_refresh_token("tenantA", "rt-123").unwrap();

        assert_eq!(
            service.raw("authgear_tenantA_refreshToken"),
            Some(b"rt-123".to_vec())
        );
    }

    #[test]
    fn test_persistent_overwrite() {
        let (storage, _) = persistent();

        storage.set_refresh_token("tenantA", "v1").unwrap();
        storage.set_refresh_token("tenantA", "v2").unwrap();

        assert_eq!(
            storage.get_refresh_token("tenantA").unwrap(),
            Some("v2".to_string())
        );
    }

    #[test]
    fn test_delete_without_token_succeeds() {
        let (storage, _) = persistent();
        storage.del_refresh_token("nobody").unwrap();
        assert_eq!(storage.get_refresh_token("nobody").unwrap(), None);

        let transient = TransientTokenStorage::new();
        transient.del_refresh_token("nobody").unwrap();
        assert_eq!(transient.get_refresh_token("nobody").unwrap(), None);
    }

    #[test]
    fn test_persistent_set_failure_surfaces_native_status() {
        let (storage, service) = persistent();
        service.fail(Primitive::Add, -25308);

        let err = storage.set_refresh_token("tenantA", "rt-123").unwrap_err();

        assert!(matches!(err, StorageError::NativeStatus(-25308)));
        service.clear_failures();
        assert_eq!(storage.get_refresh_token("tenantA").unwrap(), None);
    }

    #[test]
    fn test_transient_instances_do_not_share_records() {
        let first = TransientTokenStorage::new();
        let second = TransientTokenStorage::new();

        first.set_refresh_token("tenantA", "rt").unwrap();
        assert_eq!(second.get_refresh_token("tenantA").unwrap(), None);
    }

    #[test]
    fn test_open_transient_from_settings() {
        let settings = Settings {
            storage_kind: StorageKind::Transient,
            ..Settings::new()
        };

        let storage = open_token_storage(&settings);
        assert_eq!(storage.backend_name(), "In-memory");
        exercise_lifecycle(storage.as_ref());
    }
}
