use labelhub_core::models::ImportResult;
use labelhub_core::AppError;
use labelhub_storage::Storage;
use std::sync::Arc;
use uuid::Uuid;

use super::classify;
use super::single::store_single_file;
use super::types::{UploadLog, UploadedFile};

/// Stores a single image as a one-item dataset
#[derive(Clone)]
pub struct ImageStrategy {
    storage: Arc<dyn Storage>,
}

impl ImageStrategy {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Image content type, unless the name says it is really an archive.
    pub fn can_handle(&self, file: &UploadedFile) -> bool {
        file.declared_content_type()
            .map(classify::is_image_content_type)
            .unwrap_or(false)
            && !classify::is_archive_name(&file.filename)
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
            classify::DEFAULT_IMAGE_CONTENT_TYPE,
            log,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use labelhub_storage::test_helpers::MockStorage;

    fn file(name: &str, content_type: Option<&str>) -> UploadedFile {
        UploadedFile::new(
            name,
            content_type.map(String::from),
            Bytes::from_static(b"\x89PNG"),
        )
    }

    #[test]
    fn test_can_handle() {
        let strategy = ImageStrategy::new(Arc::new(MockStorage::new()));
        assert!(strategy.can_handle(&file("cat.jpg", Some("image/jpeg"))));
        assert!(strategy.can_handle(&file("cat", Some("image/webp"))));
        assert!(!strategy.can_handle(&file("photos.zip", Some("image/png"))));
        assert!(!strategy.can_handle(&file("cat.jpg", None)));
        assert!(!strategy.can_handle(&file("cat.bmp", Some("image/bmp"))));
    }

    #[tokio::test]
    async fn test_process_uploads_one_item() {
        let storage = Arc::new(MockStorage::new());
        let strategy = ImageStrategy::new(storage.clone());
        let project_id = Uuid::new_v4();
        let log = UploadLog::new();

        let result = strategy
            .process(&file("cat.jpg", Some("image/jpeg")), project_id, "cat-import", &log)
            .await
            .unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(
            result.storage_prefix,
            format!("project-{}/cat-import", project_id)
        );

        let uploads = storage.uploads();
        assert_eq!(uploads.len(), 1);
        let path = &uploads[0].path;
        assert!(path.starts_with(&format!("{}/", result.storage_prefix)));
        assert!(path.ends_with("/cat.jpg"));
        assert_eq!(uploads[0].content_type, "image/jpeg");

        let item = &result.items[0];
        assert_eq!(item.name, "cat.jpg");
        assert_eq!(item.content_type, "image/jpeg");
        assert_eq!(item.storage_location, MockStorage::location_for(path));

        let folder = path.trim_end_matches("/cat.jpg");
        assert_eq!(storage.folders(), vec![folder.to_string()]);
        assert_eq!(log.paths(), vec![path.clone()]);
    }

    #[tokio::test]
    async fn test_process_surfaces_storage_rejection() {
        let storage = Arc::new(MockStorage::new().failing_on_upload(1));
        let strategy = ImageStrategy::new(storage.clone());
        let log = UploadLog::new();

        let err = strategy
            .process(&file("cat.jpg", Some("image/jpeg")), Uuid::new_v4(), "cats", &log)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StorageFailure(_)));
        assert!(log.is_empty());
    }
}
