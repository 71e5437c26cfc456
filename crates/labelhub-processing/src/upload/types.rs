//! Types for the upload strategies.

use bytes::Bytes;
use std::sync::Mutex;

/// A file received for import. Exists only for the duration of one import.
#[derive(Clone, Debug)]
pub struct UploadedFile {
    /// Filename as declared by the client, possibly with directory components
    pub filename: String,
    /// Content type as declared by the client
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Declared content type, ignoring blank values.
    pub fn declared_content_type(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
    }
}

/// Tuning knobs shared by all strategies
#[derive(Clone, Copy, Debug)]
pub struct ProcessingOptions {
    /// Archive entries uploaded at once. `1` uploads strictly one after another.
    pub upload_concurrency: usize,
    /// Largest decompressed archive member accepted, in bytes.
    pub max_entry_bytes: u64,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            upload_concurrency: 1,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

/// Matches the default request size limit.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 200 * 1024 * 1024;

/// Storage paths successfully written during one import.
///
/// Owned by the caller so the paths survive a strategy that fails or is
/// cancelled halfway through.
#[derive(Debug, Default)]
pub struct UploadLog {
    paths: Mutex<Vec<String>>,
}

impl UploadLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, path: impl Into<String>) {
        self.paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(path.into());
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.paths
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_empty()
    }
}
