//! Storage settings management
//!
//! Stores non-sensitive configuration in a plain JSON file: which backend to
//! open and which keychain service to file entries under.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, StorageError};
use crate::storage::DEFAULT_SERVICE_NAME;

/// Name of the settings file inside the settings directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Which lifetime tier a token store uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum StorageKind {
    /// In-memory, lost when the process exits
    Transient,
    /// OS keychain, survives restarts
    #[default]
    Persistent,
}

/// Token store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Keychain service name entries are filed under
    pub service_name: String,
    /// Backend used for refresh tokens
    pub storage_kind: StorageKind,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self {
            version: 1,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            storage_kind: StorageKind::Persistent,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a settings manager over `settings.json` in `settings_dir`
    pub fn new(settings_dir: &Path) -> Result<Self> {
        let settings_file = settings_dir.join(SETTINGS_FILE);
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    /// Create a settings manager in the platform configuration directory
    pub fn open_default() -> Result<Self> {
        let dir = Self::default_dir()?;
        Self::new(&dir)
    }

    /// Get the default settings directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "authgear", "token-store")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                StorageError::Settings("Could not determine config directory".to_string())
            })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::new());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        if settings.service_name.is_empty() {
            return Err(StorageError::Settings(
                "serviceName must not be empty".to_string(),
            ));
        }
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.settings)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Path of the backing settings file
    pub fn path(&self) -> &Path {
        &self.settings_file
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Update settings and save
    pub fn update(&mut self, settings: Settings) -> Result<()> {
        self.settings = settings;
        self.save()
    }

    /// Set the keychain service name and save
    pub fn set_service_name(&mut self, service_name: &str) -> Result<()> {
        if service_name.is_empty() {
            return Err(StorageError::Settings(
                "service name must not be empty".to_string(),
            ));
        }
        self.settings.service_name = service_name.to_string();
        self.save()
    }

    /// Set the storage kind and save
    pub fn set_storage_kind(&mut self, kind: StorageKind) -> Result<()> {
        self.settings.storage_kind = kind;
        self.save()
    }

    /// Reset settings to defaults and delete settings file
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::new();

        if self.settings_file.exists() {
            std::fs::remove_file(&self.settings_file)?;
        }

        Ok(())
    }
}
