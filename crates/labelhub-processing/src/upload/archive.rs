use futures::stream::{self, StreamExt};
use labelhub_core::models::{FileItem, ImportResult};
use labelhub_core::AppError;
use labelhub_storage::{paths, Storage};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::classify::{self, ContentKind};
use super::types::{UploadLog, UploadedFile, DEFAULT_MAX_ENTRY_BYTES};
use crate::archive::{self, ArchiveEntry, ArchiveFormat};

/// Expands a zip or rar archive into one stored file per member.
///
/// Members must be either all images or all text documents; anything else is
/// rejected before the first upload. Members are uploaded in archive order
/// under one shared random subfolder.
#[derive(Clone)]
pub struct ArchiveStrategy {
    storage: Arc<dyn Storage>,
    upload_concurrency: usize,
    max_entry_bytes: u64,
}

/// Check the homogeneity rule and return the single kind of content.
pub(crate) fn validate_members(names: &[String]) -> Result<ContentKind, AppError> {
    if names.is_empty() {
        return Err(AppError::InvalidInput(
            "Archive contains no files".to_string(),
        ));
    }

    let all_images = names.iter().all(|name| classify::is_image_name(name));
    let all_text = names.iter().all(|name| classify::is_text_name(name));

    match (all_images, all_text) {
        (true, _) => Ok(ContentKind::Image),
        (_, true) => Ok(ContentKind::Text),
        _ => Err(AppError::InvalidInput(
            "Archive must contain only images OR only text files".to_string(),
        )),
    }
}

impl ArchiveStrategy {
    pub fn new(storage: Arc<dyn Storage>, upload_concurrency: usize) -> Self {
        Self {
            storage,
            upload_concurrency: upload_concurrency.max(1),
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }

    /// Reject members that decompress to more than `limit` bytes.
    pub fn with_max_entry_bytes(mut self, limit: u64) -> Self {
        self.max_entry_bytes = limit;
        self
    }

    pub fn can_handle(&self, file: &UploadedFile) -> bool {
        classify::is_archive_name(&file.filename)
    }

    pub async fn process(
        &self,
        file: &UploadedFile,
        project_id: Uuid,
        dataset_name: &str,
        log: &UploadLog,
    ) -> Result<ImportResult, AppError> {
        let format = classify::extension(&file.filename)
            .and_then(|ext| ArchiveFormat::from_extension(&ext))
            .ok_or_else(|| AppError::InvalidInput("Unsupported archive format".to_string()))?;

        let data = file.data.clone();
        let limit = self.max_entry_bytes;
        let names = tokio::task::spawn_blocking(move || archive::list_entries(format, &data, limit))
            .await
            .map_err(|e| AppError::Internal(format!("Archive listing task failed: {}", e)))??;

        let kind = validate_members(&names)?;

        let folder = paths::new_upload_folder(project_id, dataset_name);
        self.storage.ensure_folder(&folder).await?;

        tracing::debug!(
            project_id = %project_id,
            folder = %folder,
            entry_count = names.len(),
            kind = ?kind,
            concurrency = self.upload_concurrency,
            "Uploading archive entries"
        );

        // Decompression stays on a blocking thread; entries reach the uploader
        // through a one-slot channel, so only a couple are held in memory at once.
        let (tx, rx) = mpsc::channel::<ArchiveEntry>(1);
        let data = file.data.clone();
        let producer = tokio::task::spawn_blocking(move || {
            archive::read_entries(format, &data, limit, |entry| {
                tx.blocking_send(entry).is_ok()
            })
        });

        let storage = &self.storage;
        let folder = folder.as_str();
        let uploads = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|entry| (entry, rx))
        })
        .map(|entry| async move {
            let path = paths::object_path(folder, &entry.name);
            let content_type = classify::content_type_for(&entry.name);
            let size = entry.data.len();
            let location = storage.upload(&path, content_type, entry.data).await?;
            log.record(path.clone());
            tracing::debug!(path = %path, size_bytes = size, "Stored archive entry");
            Ok::<_, AppError>(FileItem {
                name: entry.name,
                content_type: content_type.to_string(),
                storage_location: location,
            })
        })
        .buffered(self.upload_concurrency);
        let mut uploads = std::pin::pin!(uploads);

        let mut items = Vec::with_capacity(names.len());
        while let Some(item) = uploads.next().await {
            items.push(item?);
        }

        producer
            .await
            .map_err(|e| AppError::Internal(format!("Archive reader task failed: {}", e)))??;

        Ok(ImportResult {
            items,
            storage_prefix: paths::dataset_prefix(project_id, dataset_name),
        })
    }
}
