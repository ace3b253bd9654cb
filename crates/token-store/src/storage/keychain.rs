//! OS Keychain secure-item service
//!
//! Uses the system keychain through the `keyring` crate:
//! - macOS: Keychain
//! - Windows: Credential Manager (DPAPI)
//! - Linux: Secret Service (GNOME Keyring, KWallet)
//!
//! Each derived key becomes one entry whose account/user is the key and whose
//! password is the UTF-8 secret. `keyring` only offers an upserting write, so
//! `add` and `update` check for the entry first to keep the
//! add-fails-if-present / update-fails-if-absent contract.

use keyring::Entry;
use tracing::{debug, warn};

use super::item::{ItemLookup, ItemStatus, OsStatus, SecureItemService, STATUS_DUPLICATE_ITEM};

/// Default service name used for keychain entries
pub const DEFAULT_SERVICE_NAME: &str = "authgear-token-store";

/// Status codes for `keyring` failures that carry no native code
pub mod status {
    use super::OsStatus;

    /// Invalid parameter (the value handed in was not UTF-8)
    pub const PARAM: OsStatus = -50;
    pub const PLATFORM_FAILURE: OsStatus = -1001;
    pub const NO_STORAGE_ACCESS: OsStatus = -1002;
    pub const TOO_LONG: OsStatus = -1003;
    pub const INVALID_ATTRIBUTE: OsStatus = -1004;
    pub const AMBIGUOUS: OsStatus = -1005;
    pub const UNKNOWN: OsStatus = -1099;
}

/// Secure-item service backed by the OS keychain
#[derive(Debug, Clone)]
pub struct KeyringItemService {
    service: String,
}

impl KeyringItemService {
    /// Create a service that files entries under `service`
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// The keychain service name entries are filed under
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Check whether the keychain can be queried, without writing to it
    pub fn is_available(&self) -> bool {
        match self.find("__availability_probe__") {
            ItemLookup::Found(_) | ItemLookup::NotFound => true,
            ItemLookup::Failure(code) => {
                warn!("Keychain is not available: status {}", code);
                false
            }
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, OsStatus> {
        Entry::new(&self.service, key).map_err(|e| failure_code(&e))
    }

    fn write(&self, key: &str, value: &[u8]) -> ItemStatus {
        let Ok(password) = std::str::from_utf8(value) else {
            return ItemStatus::Failure(status::PARAM);
        };
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(code) => return ItemStatus::Failure(code),
        };
        match entry.set_password(password) {
            Ok(()) => ItemStatus::Success,
            Err(e) => ItemStatus::Failure(failure_code(&e)),
        }
    }
}

impl Default for KeyringItemService {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

/// Map a `keyring` error to a status code
fn failure_code(err: &keyring::Error) -> OsStatus {
    match err {
        keyring::Error::PlatformFailure(_) => status::PLATFORM_FAILURE,
        keyring::Error::NoStorageAccess(_) => status::NO_STORAGE_ACCESS,
        keyring::Error::TooLong(_, _) => status::TOO_LONG,
        keyring::Error::Invalid(_, _) => status::INVALID_ATTRIBUTE,
        keyring::Error::Ambiguous(_) => status::AMBIGUOUS,
        _ => status::UNKNOWN,
    }
}

impl SecureItemService for KeyringItemService {
    fn find(&self, key: &str) -> ItemLookup {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(code) => return ItemLookup::Failure(code),
        };
        match entry.get_password() {
            Ok(password) => ItemLookup::Found(password.into_bytes()),
            Err(keyring::Error::NoEntry) => ItemLookup::NotFound,
            // The entry exists but its payload is not UTF-8; hand the raw
            // bytes up so the driver can report it.
            Err(keyring::Error::BadEncoding(bytes)) => ItemLookup::Found(bytes),
            Err(e) => {
                debug!("Keychain lookup error for {}: {}", key, e);
                ItemLookup::Failure(failure_code(&e))
            }
        }
    }

    fn add(&self, key: &str, value: &[u8]) -> ItemStatus {
        match self.find(key) {
            ItemLookup::Found(_) => ItemStatus::Failure(STATUS_DUPLICATE_ITEM),
            ItemLookup::NotFound => self.write(key, value),
            ItemLookup::Failure(code) => ItemStatus::Failure(code),
        }
    }

    fn update(&self, key: &str, value: &[u8]) -> ItemStatus {
        match self.find(key) {
            ItemLookup::Found(_) => self.write(key, value),
            ItemLookup::NotFound => ItemStatus::ItemNotFound,
            ItemLookup::Failure(code) => ItemStatus::Failure(code),
        }
    }

    fn delete(&self, key: &str) -> ItemStatus {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(code) => return ItemStatus::Failure(code),
        };
        match entry.delete_password() {
            Ok(()) => ItemStatus::Success,
            Err(keyring::Error::NoEntry) => ItemStatus::ItemNotFound,
            Err(e) => {
                debug!("Keychain delete error for {}: {}", key, e);
                ItemStatus::Failure(failure_code(&e))
            }
        }
    }

    fn service_name(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS Keychain";

        #[cfg(target_os = "windows")]
        return "Windows Credential Manager";

        #[cfg(target_os = "linux")]
        return "Linux Secret Service";

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        return "System Keychain";
    }
}
