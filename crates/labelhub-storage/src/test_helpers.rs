//! In-memory [`Storage`] for unit tests
//!
//! Records every call so tests can assert on upload order, folder creation and
//! cleanup without a real provider.

use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Mutex;
use std::time::Duration;

/// A single recorded upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub path: String,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Default)]
struct MockState {
    uploads: Vec<RecordedUpload>,
    folders: Vec<String>,
    deletes: Vec<String>,
    upload_attempts: usize,
}

/// Mock storage keeping objects in memory
#[derive(Default)]
pub struct MockStorage {
    state: Mutex<MockState>,
    fail_on_upload: Option<usize>,
    fail_ensure_folder: bool,
    upload_delay: Option<Duration>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `n`-th upload attempt (1-based) with status 500.
    pub fn failing_on_upload(mut self, n: usize) -> Self {
        self.fail_on_upload = Some(n);
        self
    }

    pub fn failing_ensure_folder(mut self) -> Self {
        self.fail_ensure_folder = true;
        self
    }

    /// Sleep before every upload.
    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Successful uploads in call order
    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state().uploads.clone()
    }

    pub fn uploaded_paths(&self) -> Vec<String> {
        self.state().uploads.iter().map(|u| u.path.clone()).collect()
    }

    pub fn upload_attempts(&self) -> usize {
        self.state().upload_attempts
    }

    pub fn folders(&self) -> Vec<String> {
        self.state().folders.clone()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.state().deletes.clone()
    }

    pub fn location_for(path: &str) -> String {
        format!("mock://{}", path)
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn ensure_folder(&self, path: &str) -> StorageResult<()> {
        if self.fail_ensure_folder {
            return Err(StorageError::BackendError(format!(
                "cannot create folder {}",
                path
            )));
        }
        self.state().folders.push(path.to_string());
        Ok(())
    }

    async fn upload(&self, path: &str, content_type: &str, data: Bytes) -> StorageResult<String> {
        let attempt = {
            let mut state = self.state();
            state.upload_attempts += 1;
            state.upload_attempts
        };

        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_on_upload == Some(attempt) {
            return Err(StorageError::Rejected {
                status: 500,
                body: format!("mock failure on upload {}", attempt),
            });
        }

        self.state().uploads.push(RecordedUpload {
            path: path.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        Ok(Self::location_for(path))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let mut state = self.state();
        state.deletes.push(path.to_string());
        state.uploads.retain(|u| u.path != path);
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
