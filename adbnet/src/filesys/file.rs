//! JSON-backed files

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::errors::AdbNetError;

/// A file on disk addressed by path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }

    pub async fn read_string(&self) -> Result<String, AdbNetError> {
        Ok(fs::read_to_string(&self.path).await?)
    }

    /// Read and deserialize the file.
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, AdbNetError> {
        let contents = self.read_string().await?;
        serde_json::from_str(&contents).map_err(|e| {
            AdbNetError::StorageError(format!("{}: {}", self.path.display(), e))
        })
    }

    /// Read the file, or `None` when it does not exist yet.
    pub async fn read_json_opt<T: DeserializeOwned>(&self) -> Result<Option<T>, AdbNetError> {
        if !self.exists().await {
            return Ok(None);
        }
        self.read_json().await.map(Some)
    }

    /// Serialize `value` as pretty JSON and replace the file atomically.
    ///
    /// Parent directories are created as needed.
    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), AdbNetError> {
        let contents = serde_json::to_string_pretty(value)?;
        self.write_atomic(contents.as_bytes()).await
    }

    async fn write_atomic(&self, contents: &[u8]) -> Result<(), AdbNetError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}
