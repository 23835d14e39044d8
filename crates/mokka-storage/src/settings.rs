//! Whole-record settings store.

use crate::error::StorageResult;
use mokka_core::DeviceSettings;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed store for the [`DeviceSettings`] record.
///
/// Loads read the whole record, saves rewrite it completely. A missing file
/// is initialized with default settings on first load, so the service comes
/// up unconfigured rather than failing.
///
/// # Examples
///
/// ```no_run
/// use mokka_storage::SettingsStore;
///
/// # async fn example() -> mokka_storage::StorageResult<()> {
/// let store = SettingsStore::new("coffee_machine_settings.json");
///
/// let mut settings = store.load().await?;
/// settings.price = 250;
/// store.save(&settings).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings record, creating the file with defaults when it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or created, or holds
    /// something that is not a settings record.
    pub async fn load(&self) -> StorageResult<DeviceSettings> {
        if !tokio::fs::try_exists(&self.path).await? {
            debug!(path = %self.path.display(), "settings file not found, initializing defaults");
            let defaults = DeviceSettings::default();
            self.save(&defaults).await?;
            return Ok(defaults);
        }

        debug!(path = %self.path.display(), "reading settings");
        let raw = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Write the whole settings record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, settings: &DeviceSettings) -> StorageResult<()> {
        debug!(path = %self.path.display(), "writing settings");
        let raw = serde_json::to_vec(settings)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}
