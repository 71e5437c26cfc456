use labelhub_core::models::ImportResult;
use labelhub_core::AppError;
use labelhub_storage::Storage;
use std::sync::Arc;
use uuid::Uuid;

use super::archive::ArchiveStrategy;
use super::image::ImageStrategy;
use super::text::TextStrategy;
use super::types::{ProcessingOptions, UploadLog, UploadedFile};

/// The closed set of upload strategies
#[derive(Clone)]
pub enum UploadStrategy {
    Archive(ArchiveStrategy),
    Image(ImageStrategy),
    Text(TextStrategy),
}

impl UploadStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            UploadStrategy::Archive(_) => "archive",
            UploadStrategy::Image(_) => "image",
            UploadStrategy::Text(_) => "text",
        }
    }

    pub fn can_handle(&self, file: &UploadedFile) -> bool {
        match self {
            UploadStrategy::Archive(s) => s.can_handle(file),
            UploadStrategy::Image(s) => s.can_handle(file),
            UploadStrategy::Text(s) => s.can_handle(file),
        }
    }

    pub async fn process(
        &self,
        file: &UploadedFile,
        project_id: Uuid,
        dataset_name: &str,
        log: &UploadLog,
    ) -> Result<ImportResult, AppError> {
        match self {
            UploadStrategy::Archive(s) => s.process(file, project_id, dataset_name, log).await,
            UploadStrategy::Image(s) => s.process(file, project_id, dataset_name, log).await,
            UploadStrategy::Text(s) => s.process(file, project_id, dataset_name, log).await,
        }
    }
}

/// Picks the first strategy able to handle a file.
///
/// Archives are checked first so a zip or rar is never stored as a single file.
#[derive(Clone)]
pub struct StrategyDispatcher {
    strategies: Vec<UploadStrategy>,
}

impl StrategyDispatcher {
    pub fn new(storage: Arc<dyn Storage>, options: ProcessingOptions) -> Self {
        Self {
            strategies: vec![
                UploadStrategy::Archive(
                    ArchiveStrategy::new(storage.clone(), options.upload_concurrency)
                        .with_max_entry_bytes(options.max_entry_bytes),
                ),
                UploadStrategy::Image(ImageStrategy::new(storage.clone())),
                UploadStrategy::Text(TextStrategy::new(storage)),
            ],
        }
    }

    pub fn strategies(&self) -> &[UploadStrategy] {
        &self.strategies
    }

    pub fn select(&self, file: &UploadedFile) -> Result<&UploadStrategy, AppError> {
        self.strategies
            .iter()
            .find(|strategy| strategy.can_handle(file))
            .ok_or_else(|| {
                AppError::InvalidInput("No upload strategy can handle this file type".to_string())
            })
    }

    /// Select a strategy and run it. Exactly one strategy is invoked.
    pub async fn dispatch(
        &self,
        file: &UploadedFile,
        project_id: Uuid,
        dataset_name: &str,
        log: &UploadLog,
    ) -> Result<ImportResult, AppError> {
        let strategy = self.select(file)?;
        tracing::debug!(
            strategy = strategy.name(),
            filename = %file.filename,
            size_bytes = file.size(),
            "Selected upload strategy"
        );
        strategy.process(file, project_id, dataset_name, log).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::testing::zip_bytes;
    use bytes::Bytes;
    use labelhub_storage::test_helpers::MockStorage;

    fn dispatcher() -> (Arc<MockStorage>, StrategyDispatcher) {
        let storage = Arc::new(MockStorage::new());
        let dispatcher = StrategyDispatcher::new(storage.clone(), ProcessingOptions::default());
        (storage, dispatcher)
    }

    fn file(name: &str, content_type: Option<&str>) -> UploadedFile {
        UploadedFile::new(name, content_type.map(String::from), Bytes::from_static(b"x"))
    }

    #[test]
    fn test_fixed_priority_order() {
        let (_, dispatcher) = dispatcher();
        let order: Vec<_> = dispatcher.strategies().iter().map(|s| s.name()).collect();
        assert_eq!(order, vec!["archive", "image", "text"]);
    }

    #[test]
    fn test_selection() {
        let (_, dispatcher) = dispatcher();
        let pick = |f: UploadedFile| dispatcher.select(&f).map(|s| s.name());

        assert_eq!(pick(file("cat.jpg", Some("image/jpeg"))).unwrap(), "image");
        assert_eq!(pick(file("notes.txt", None)).unwrap(), "text");
        // A zip labelled as an image is still an archive.
        assert_eq!(pick(file("photos.zip", Some("image/png"))).unwrap(), "archive");
        assert_eq!(pick(file("photos.rar", Some("application/x-rar"))).unwrap(), "archive");
    }

    #[test]
    fn test_unsupported_type() {
        let (_, dispatcher) = dispatcher();
        match dispatcher.select(&file("movie.mp4", Some("video/mp4"))) {
            Err(AppError::InvalidInput(message)) => {
                assert_eq!(message, "No upload strategy can handle this file type")
            }
            Err(other) => panic!("Expected InvalidInput, got {:?}", other),
            Ok(strategy) => panic!("Unexpected strategy {}", strategy.name()),
        }
    }

    #[tokio::test]
    async fn test_dispatch_archive() {
        let (storage, dispatcher) = dispatcher();
        let archive = UploadedFile::new(
            "photos.zip",
            Some("application/zip".to_string()),
            Bytes::from(zip_bytes(&[("1.png", b"1"), ("2.png", b"2")])),
        );

        let result = dispatcher
            .dispatch(&archive, Uuid::new_v4(), "batch1", &UploadLog::new())
            .await
            .unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(storage.uploads().len(), 2);
    }
}
