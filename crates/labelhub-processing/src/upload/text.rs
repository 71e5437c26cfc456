use labelhub_core::models::ImportResult;
use labelhub_core::AppError;
use labelhub_storage::Storage;
use std::sync::Arc;
use uuid::Uuid;

use super::classify;
use super::single::store_single_file;
use super::types::{UploadLog, UploadedFile};

/// Stores a single text document (plain text, JSON, XML) as a one-item dataset.
/// Content is not parsed.
#[derive(Clone)]
pub struct TextStrategy {
    storage: Arc<dyn Storage>,
}

impl TextStrategy {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn can_handle(&self, file: &UploadedFile) -> bool {
        file.declared_content_type()
            .map(classify::is_text_content_type)
            .unwrap_or(false)
            || classify::is_text_name(&file.filename)
    }

    pub async fn process(
        &self,
        file: &UploadedFile,
        project_id: Uuid,
        dataset_name: &str,
        log: &UploadLog,
    ) -> Result<ImportResult, AppError> {
        store_single_file(
            self.storage.as_ref(),
            file,
            project_id,
            dataset_name,
            classify::DEFAULT_TEXT_CONTENT_TYPE,
            log,
        )
        .await
    }
}
