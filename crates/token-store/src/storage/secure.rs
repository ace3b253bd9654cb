//! Secure-item storage backend
//!
//! Adapts a [`SecureItemService`] to the [`StorageDriver`] contract. The
//! service has no native upsert, so `set` looks the item up first and then
//! issues either `update` or `add`.
//!
//! The lookup and the write are two separate calls. Another writer touching
//! the same key in between can make `add` report a duplicate or `update`
//! report a missing item; that status is returned to the caller as-is.

use std::sync::Arc;

use tracing::{debug, error, warn};

use super::item::{ItemLookup, ItemStatus, SecureItemService};
use super::StorageDriver;
use crate::error::{Result, StorageError};

/// Durable storage backend over an OS secure-item service
#[derive(Clone)]
pub struct SecureItemDriver {
    service: Arc<dyn SecureItemService>,
}

impl SecureItemDriver {
    /// Create a driver over the given service
    pub fn new(service: Arc<dyn SecureItemService>) -> Self {
        Self { service }
    }

    /// Turn a write/delete status into a result. `ItemNotFound` only counts as
    /// success where the caller says so.
    fn check(key: &str, op: &str, status: ItemStatus, not_found_ok: bool) -> Result<()> {
        match status {
            ItemStatus::Success => Ok(()),
            ItemStatus::ItemNotFound if not_found_ok => Ok(()),
            other => {
                let code = other.code();
                warn!("Secure item {} failed for {}: status {}", op, key, code);
                Err(StorageError::NativeStatus(code))
            }
        }
    }

    /// Whether an item exists for `key`
    fn exists(&self, key: &str) -> Result<bool> {
        match self.service.find(key) {
            ItemLookup::Found(_) => Ok(true),
            ItemLookup::NotFound => Ok(false),
            ItemLookup::Failure(code) => {
                warn!("Secure item lookup failed for {}: status {}", key, code);
                Err(StorageError::NativeStatus(code))
            }
        }
    }
}

impl std::fmt::Debug for SecureItemDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureItemDriver")
            .field("service", &self.service.service_name())
            .finish()
    }
}

impl StorageDriver for SecureItemDriver {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.service.find(key) {
            ItemLookup::Found(bytes) => {
                let value = String::from_utf8(bytes).map_err(|source| {
                    error!("Secure item {} holds non-UTF-8 data", key);
                    StorageError::InvalidEncoding {
                        key: key.to_string(),
                        source,
                    }
                })?;
                debug!("Retrieved key from secure storage: {}", key);
                Ok(Some(value))
            }
            ItemLookup::NotFound => {
                debug!("Key not found in secure storage: {}", key);
                Ok(None)
            }
            ItemLookup::Failure(code) => {
                warn!("Secure item lookup failed for {}: status {}", key, code);
                Err(StorageError::NativeStatus(code))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.exists(key)? {
            let status = self.service.update(key, value.as_bytes());
            Self::check(key, "update", status, false)?;
            debug!("Updated key in secure storage: {}", key);
        } else {
            let status = self.service.add(key, value.as_bytes());
            Self::check(key, "add", status, false)?;
            debug!("Added key to secure storage: {}", key);
        }
        Ok(())
    }

    fn del(&self, key: &str) -> Result<()> {
        let status = self.service.delete(key);
        Self::check(key, "delete", status, true)?;
        debug!("Deleted key from secure storage: {}", key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        self.service.service_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{STATUS_DUPLICATE_ITEM, STATUS_ITEM_NOT_FOUND};
    use crate::test_utils::{MockItemService, Primitive};

    fn driver() -> (SecureItemDriver, Arc<MockItemService>) {
        let service = Arc::new(MockItemService::new());
        (SecureItemDriver::new(service.clone()), service)
    }

    #[test]
    fn test_round_trip() {
        let (driver, _) = driver();

        driver.set("k", "v").unwrap();
        assert_eq!(driver.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_get_missing_is_none() {
        let (driver, _) = driver();
        assert_eq!(driver.get("missing").unwrap(), None);
    }

    #[test]
    fn test_set_new_key_finds_then_adds() {
        let (driver, service) = driver();

        driver.set("k", "v").unwrap();

        assert_eq!(service.calls(), vec![Primitive::Find, Primitive::Add]);
        assert_eq!(service.raw("k"), Some(b"v".to_vec()));
    }

    #[test]
    fn test_set_existing_key_finds_then_updates() {
        let (driver, service) = driver();

        driver.set("k", "v1").unwrap();
        service.clear_calls();
        driver.set("k", "v2").unwrap();

        assert_eq!(service.calls(), vec![Primitive::Find, Primitive::Update]);
        assert_eq!(driver.get("k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn test_set_find_failure_skips_write() {
        let (driver, service) = driver();
        service.fail(Primitive::Find, -34018);

        let err = driver.set("k", "v").unwrap_err();

        assert!(matches!(err, StorageError::NativeStatus(-34018)));
        assert_eq!(service.calls(), vec![Primitive::Find]);
        assert_eq!(service.raw("k"), None);
    }

    #[test]
    fn test_set_add_failure_propagates_status() {
        let (driver, service) = driver();
        service.fail(Primitive::Add, -25308);

        let err = driver.set("k", "v").unwrap_err();

        assert_eq!(err.native_status(), Some(-25308));
        assert_eq!(service.raw("k"), None);
    }

    #[test]
    fn test_set_update_failure_keeps_old_value() {
        let (driver, service) = driver();
        driver.set("k", "v1").unwrap();
        service.fail(Primitive::Update, -25308);

        let err = driver.set("k", "v2").unwrap_err();

        assert_eq!(err.native_status(), Some(-25308));
        service.clear_failures();
        assert_eq!(driver.get("k").unwrap(), Some("v1".to_string()));
    }

    #[test]
    fn test_set_race_with_concurrent_writer_surfaces_duplicate() {
        let (driver, service) = driver();
        // Another writer creates the item between our lookup and our add.
        service.insert_after_next_find("k", b"theirs");

        let err = driver.set("k", "ours").unwrap_err();

        assert_eq!(err.native_status(), Some(STATUS_DUPLICATE_ITEM));
        assert_eq!(service.raw("k"), Some(b"theirs".to_vec()));
    }

    #[test]
    fn test_get_failure_propagates_status() {
        let (driver, service) = driver();
        service.fail(Primitive::Find, -25293);

        let err = driver.get("k").unwrap_err();
        assert!(matches!(err, StorageError::NativeStatus(-25293)));
    }

    #[test]
    fn test_find_reporting_not_found_status_is_absence() {
        let (driver, service) = driver();
        service.insert_raw("k", b"v");
        service.fail(Primitive::Find, STATUS_ITEM_NOT_FOUND);

        assert_eq!(driver.get("k").unwrap(), None);

        // The item looks absent, so set takes the add path and hits the duplicate.
        let err = driver.set("k", "v2").unwrap_err();
        assert_eq!(err.native_status(), Some(STATUS_DUPLICATE_ITEM));
    }

    #[test]
    fn test_get_non_utf8_is_invalid_encoding() {
        let (driver, service) = driver();
        service.insert_raw("k", &[0xff, 0xfe, 0xfd]);

        let err = driver.get("k").unwrap_err();
        match err {
            StorageError::InvalidEncoding { key, .. } => assert_eq!(key, "k"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let (driver, service) = driver();

        driver.del("missing").unwrap();

        assert_eq!(service.calls(), vec![Primitive::Delete]);
        assert_eq!(driver.get("missing").unwrap(), None);
    }

    #[test]
    fn test_delete_removes_item() {
        let (driver, _) = driver();

        driver.set("k", "v").unwrap();
        driver.del("k").unwrap();

        assert_eq!(driver.get("k").unwrap(), None);
    }

    #[test]
    fn test_delete_failure_propagates_status() {
        let (driver, service) = driver();
        driver.set("k", "v").unwrap();
        service.fail(Primitive::Delete, -25244);

        let err = driver.del("k").unwrap_err();

        assert_eq!(err.native_status(), Some(-25244));
        service.clear_failures();
        assert_eq!(driver.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_backend_name_comes_from_service() {
        let (driver, _) = driver();
        assert_eq!(driver.backend_name(), "Mock secure items");
    }
}
