use crate::paths::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/labelhub/storage")
    /// * `base_url` - Base URL for serving files (e.g., "/storage")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a storage key to a filesystem path under the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;

        let path = self.base_path.join(storage_key);

        // Existing paths may be symlinks; make sure they still resolve inside the root.
        if let Ok(canonical) = path.canonicalize() {
            let base_canonical = self.base_path.canonicalize().map_err(|e| {
                StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
            })?;
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn ensure_folder(&self, path: &str) -> StorageResult<()> {
        let dir = self.key_to_path(path)?;
        fs::create_dir_all(&dir).await?;
        Ok(())
    }

    async fn upload(&self, path: &str, _content_type: &str, data: Bytes) -> StorageResult<String> {
        let file_path = self.key_to_path(path)?;
        let size = data.len();

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&file_path).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to create file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %file_path.display(),
            key = %path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.generate_url(path))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let file_path = self.key_to_path(path)?;

        if !fs::try_exists(&file_path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&file_path).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                file_path.display(),
                e
            ))
        })?;

        tracing::info!(key = %path, "Local storage delete successful");
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/storage".to_string())
            .await
            .unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_location() {
        let (dir, storage) = storage().await;

        let location = storage
            .upload(
                "project-1/cats/abc/cat.jpg",
                "image/jpeg",
                Bytes::from_static(b"meow"),
            )
            .await
            .unwrap();

        assert_eq!(location, "/storage/project-1/cats/abc/cat.jpg");
        let written = std::fs::read(dir.path().join("project-1/cats/abc/cat.jpg")).unwrap();
        assert_eq!(written, b"meow");
    }

    #[tokio::test]
    async fn test_upload_replaces_existing_object() {
        let (dir, storage) = storage().await;
        storage
            .upload("project-1/a.txt", "text/plain", Bytes::from_static(b"one"))
            .await
            .unwrap();
        storage
            .upload("project-1/a.txt", "text/plain", Bytes::from_static(b"two"))
            .await
            .unwrap();
        assert_eq!(std::fs::read(dir.path().join("project-1/a.txt")).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_ensure_folder_twice() {
        let (dir, storage) = storage().await;
        storage.ensure_folder("project-1").await.unwrap();
        storage.ensure_folder("project-1").await.unwrap();
        assert!(dir.path().join("project-1").is_dir());
    }

    #[tokio::test]
    async fn test_upload_stream_buffers_reader() {
        let (_dir, storage) = storage().await;
        let reader = Box::pin(std::io::Cursor::new(b"streamed".to_vec()));
        let location = storage
            .upload_stream("project-1/s.txt", "text/plain", reader)
            .await
            .unwrap();
        assert_eq!(location, "/storage/project-1/s.txt");
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let (_dir, storage) = storage().await;
        let err = storage
            .upload("../escape.txt", "text/plain", Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(storage.ensure_folder("/abs").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let (_dir, storage) = storage().await;
        storage.delete("project-1/none.png").await.unwrap();
    }
}
