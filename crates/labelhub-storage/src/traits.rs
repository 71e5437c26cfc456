//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use labelhub_core::AppError;
use bytes::Bytes;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The remote store answered with a non-success status.
    #[error("Storage provider rejected upload (status {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(message) => AppError::InvalidInput(message),
            other => AppError::StorageFailure(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// All backends (Supabase, S3, local filesystem) implement this trait so the upload
/// strategies never depend on a concrete provider.
///
/// **Path format:** paths are relative object keys such as
/// `project-{project_id}/{dataset}/{random_id}/{filename}`. They must not start with `/`
/// or contain `..` segments. See [`crate::paths`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Make sure a logical folder exists. Idempotent; object stores with virtual
    /// folders implement this as a no-op.
    async fn ensure_folder(&self, path: &str) -> StorageResult<()>;

    /// Upload a fully buffered payload to `path`, replacing any existing object.
    ///
    /// Returns the location of the stored object. For a given configuration the
    /// location is a deterministic function of `path`.
    async fn upload(&self, path: &str, content_type: &str, data: Bytes) -> StorageResult<String>;

    /// Upload from a reader. The reader is drained completely before anything is
    /// sent, so the transfer always has a known length.
    async fn upload_stream(
        &self,
        path: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read from stream: {}", e))
        })?;
        self.upload(path, content_type, Bytes::from(buffer)).await
    }

    /// Delete the object at `path`. Deleting a missing object is not an error.
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
