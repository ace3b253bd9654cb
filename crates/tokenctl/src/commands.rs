//! Command implementations
//!
//! Refresh tokens go to the store selected by the settings; key ids always go
//! to the persistent container store.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use token_store::{
    open_container_storage, open_token_storage, ContainerStorage, SecretKind, Settings,
    SettingsManager, StorageKind, TokenStorage,
};

/// The stores a command operates on
pub struct Stores {
    pub tokens: Arc<dyn TokenStorage>,
    pub container: Arc<dyn ContainerStorage>,
}

impl Stores {
    /// Open the stores selected by `settings`
    pub fn open(settings: &Settings) -> Self {
        Self {
            tokens: open_token_storage(settings),
            container: open_container_storage(settings),
        }
    }

    pub fn get(&self, kind: SecretKind, namespace: &str) -> Result<Option<String>> {
        let value = match kind {
            SecretKind::RefreshToken => self.tokens.get_refresh_token(namespace),
            SecretKind::AnonymousKeyId => self.container.get_anonymous_key_id(namespace),
            SecretKind::BiometricKeyId => self.container.get_biometric_key_id(namespace),
        };
        value.with_context(|| format!("Failed to read {} for {}", kind, namespace))
    }

    pub fn set(&self, kind: SecretKind, namespace: &str, value: &str) -> Result<()> {
        let result = match kind {
            SecretKind::RefreshToken => self.tokens.set_refresh_token(namespace, value),
            SecretKind::AnonymousKeyId => self.container.set_anonymous_key_id(namespace, value),
            SecretKind::BiometricKeyId => self.container.set_biometric_key_id(namespace, value),
        };
        result.with_context(|| format!("Failed to store {} for {}", kind, namespace))?;
        info!("Stored {} for {}", kind, namespace);
        Ok(())
    }

    pub fn del(&self, kind: SecretKind, namespace: &str) -> Result<()> {
        let result = match kind {
            SecretKind::RefreshToken => self.tokens.del_refresh_token(namespace),
            SecretKind::AnonymousKeyId => self.container.del_anonymous_key_id(namespace),
            SecretKind::BiometricKeyId => self.container.del_biometric_key_id(namespace),
        };
        result.with_context(|| format!("Failed to delete {} for {}", kind, namespace))?;
        info!("Deleted {} for {}", kind, namespace);
        Ok(())
    }
}

/// Print the stored value. Returns `false` when nothing is stored.
pub fn print_secret(
    stores: &Stores,
    kind: SecretKind,
    namespace: &str,
    out: &mut impl Write,
) -> Result<bool> {
    match stores.get(kind, namespace)? {
        Some(value) => {
            writeln!(out, "{}", value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Print settings and backend information
pub fn print_status(manager: &SettingsManager, stores: &Stores, out: &mut impl Write) -> Result<()> {
    let settings = manager.get();
    writeln!(out, "settings file:  {}", manager.path().display())?;
    writeln!(out, "service name:   {}", settings.service_name)?;
    writeln!(out, "storage kind:   {}", storage_kind_name(settings.storage_kind))?;
    writeln!(out, "token backend:  {}", stores.tokens.backend_name())?;
    Ok(())
}

/// Warning for writes that will not outlive this process
pub fn transient_notice(settings: &Settings, kind: SecretKind) -> Option<&'static str> {
    match (settings.storage_kind, kind) {
        (StorageKind::Transient, SecretKind::RefreshToken) => Some(
            "note: storage kind is transient; the refresh token is kept in memory and \
             discarded when tokenctl exits",
        ),
        _ => None,
    }
}

pub fn storage_kind_name(kind: StorageKind) -> &'static str {
    match kind {
        StorageKind::Transient => "transient",
        StorageKind::Persistent => "persistent",
    }
}
