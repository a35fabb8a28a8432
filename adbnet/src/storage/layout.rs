//! Storage layout configuration

use std::path::PathBuf;

use crate::errors::AdbNetError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;
use crate::utils::home_dir;

/// On-disk layout of everything adbnet persists
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn base(&self) -> Dir {
        Dir::new(&self.base_dir)
    }

    /// Tool path, device port, scan tuning
    pub fn settings_file(&self) -> File {
        self.base().file("settings.json")
    }

    /// Saved custom commands
    pub fn commands_file(&self) -> File {
        self.base().file("commands.json")
    }

    /// User-defined key events (predefined keys are not stored)
    pub fn custom_keys_file(&self) -> File {
        self.base().file("custom_keys.json")
    }

    pub fn logs_dir(&self) -> Dir {
        self.base().subdir("logs")
    }

    /// Create the base and log directories
    pub async fn setup(&self) -> Result<(), AdbNetError> {
        self.base().create().await?;
        self.logs_dir().create().await?;
        Ok(())
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        let base_dir = home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".adbnet");
        Self::new(base_dir)
    }
}
