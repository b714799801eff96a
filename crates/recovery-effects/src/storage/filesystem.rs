//! Filesystem storage handler
//!
//! One file per key under a base directory. Writes go to a temporary file
//! that is synced and then renamed over the target, so a crash mid-write
//! leaves either the old value or the new one.

use async_trait::async_trait;
use recovery_core::effects::{StorageEffects, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Filesystem-based storage handler for production use
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    base_path: PathBuf,
}

impl FilesystemStorageHandler {
    /// Store files under `base_path`, created on first write
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the stored files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        if key.contains(['/', '\\']) || key.contains("..") {
            return Err(StorageError::InvalidKey {
                reason: format!("Key must not contain path components: {key}"),
            });
        }
        Ok(self.base_path.join(format!("{key}.dat")))
    }

    async fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to create temp file: {e}")))?;

        file.write_all(data)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write data: {e}")))?;

        file.sync_all()
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to sync: {e}")))?;

        fs::rename(&temp_path, path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to rename temp file: {e}")))
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let file_path = self.file_path(key)?;
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to create directory: {e}")))?;

        self.write_atomic(&file_path, &value).await?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let file_path = self.file_path(key)?;
        match fs::read(&file_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("Failed to read file: {e}"))),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let file_path = self.file_path(key)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to remove file: {e}"
            ))),
        }
    }
}
