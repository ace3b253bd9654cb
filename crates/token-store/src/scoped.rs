//! Namespace-scoped access to a storage driver

use crate::error::Result;
use crate::key::{KeyDeriver, SecretKind};
use crate::storage::StorageDriver;

/// Routes (namespace, kind) operations to a driver through the key deriver
#[derive(Debug, Default)]
pub(crate) struct ScopedStore<D> {
    driver: D,
    keys: KeyDeriver,
}

impl<D: StorageDriver> ScopedStore<D> {
    pub(crate) fn new(driver: D) -> Self {
        Self {
            driver,
            keys: KeyDeriver::new(),
        }
    }

    pub(crate) fn get(&self, namespace: &str, kind: SecretKind) -> Result<Option<String>> {
        self.driver.get(&self.keys.derive(namespace, kind))
    }

    pub(crate) fn set(&self, namespace: &str, kind: SecretKind, value: &str) -> Result<()> {
        self.driver.set(&self.keys.derive(namespace, kind), value)
    }

    pub(crate) fn del(&self, namespace: &str, kind: SecretKind) -> Result<()> {
        self.driver.del(&self.keys.derive(namespace, kind))
    }

    pub(crate) fn driver(&self) -> &D {
        &self.driver
    }
}
