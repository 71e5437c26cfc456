use std::sync::Arc;

use labelhub_core::models::{Dataset, DatasetImportResponse, WorkItem};
use labelhub_core::AppError;
use labelhub_db::{DatasetStore, ProjectDirectory};
use labelhub_processing::{StrategyDispatcher, UploadLog};
use labelhub_storage::paths::project_folder;
use labelhub_storage::Storage;
use uuid::Uuid;

use super::naming::resolve_dataset_name;
use super::types::{ImportOptions, ImportRequest};
use crate::auth::Principal;

/// Imports one uploaded file (single image, single text file or archive) as a new
/// dataset of a project.
///
/// Nothing is written before the caller is authorized and the file type is known to
/// be supported. Once uploads start, the dataset and its work items are only
/// committed if every upload succeeded.
pub struct DatasetImportService {
    projects: Arc<dyn ProjectDirectory>,
    datasets: Arc<dyn DatasetStore>,
    storage: Arc<dyn Storage>,
    dispatcher: StrategyDispatcher,
    options: ImportOptions,
}

impl DatasetImportService {
    pub fn new(
        projects: Arc<dyn ProjectDirectory>,
        datasets: Arc<dyn DatasetStore>,
        storage: Arc<dyn Storage>,
        dispatcher: StrategyDispatcher,
        options: ImportOptions,
    ) -> Self {
        Self {
            projects,
            datasets,
            storage,
            dispatcher,
            options,
        }
    }

    #[tracing::instrument(skip(self, principal, request), fields(project_id = %request.project_id))]
    pub async fn import(
        &self,
        principal: Option<&Principal>,
        request: ImportRequest,
    ) -> Result<DatasetImportResponse, AppError> {
        let ImportRequest {
            project_id,
            file,
            name,
            description,
        } = request;

        tracing::debug!(state = "validating", "Dataset import");
        let file = file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
        if !self.projects.project_exists(project_id).await? {
            return Err(AppError::NotFound(format!("Project {} not found", project_id)));
        }

        tracing::debug!(state = "authorizing", "Dataset import");
        let principal = principal
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
        if !principal.is_privileged()
            && !self.projects.is_member(project_id, principal.user_id).await?
        {
            return Err(AppError::Forbidden(
                "You are not a member of this project".to_string(),
            ));
        }

        let strategy = self.dispatcher.select(&file)?;
        let dataset_name = resolve_dataset_name(name.as_deref(), &file.filename)?;
        let description = description.filter(|d| !d.trim().is_empty());

        tracing::debug!(state = "folder_ensuring", "Dataset import");
        let folder = project_folder(project_id);
        if let Err(e) = self.storage.ensure_folder(&folder).await {
            tracing::warn!(
                error = %e,
                folder = %folder,
                "Failed to ensure project folder, continuing"
            );
        }

        tracing::debug!(
            state = "processing",
            strategy = strategy.name(),
            filename = %file.filename,
            size_bytes = file.size(),
            "Dataset import"
        );
        let pending = PendingUploads::new(
            project_id,
            self.storage.clone(),
            self.options.cleanup_on_failure,
        );
        let processed = tokio::time::timeout(
            self.options.timeout,
            strategy.process(&file, project_id, &dataset_name, &pending.log),
        )
        .await;

        let result = match processed {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                pending.abandon(&e);
                return Err(e);
            }
            Err(_) => {
                let err = AppError::Timeout(self.options.timeout.as_secs());
                pending.abandon(&err);
                return Err(err);
            }
        };

        tracing::debug!(
            state = "persisting",
            item_count = result.items.len(),
            "Dataset import"
        );
        let dataset = Dataset::new_import(
            project_id,
            dataset_name,
            description,
            result.storage_prefix.clone(),
            principal.user_id,
        );
        let work_items: Vec<WorkItem> = result
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| {
                WorkItem::unstarted(dataset.id, item.storage_location.clone(), position as i32)
            })
            .collect();

        if let Err(e) = self.datasets.create_import(&dataset, &work_items).await {
            tracing::error!(
                error = %e,
                project_id = %project_id,
                storage_prefix = %result.storage_prefix,
                item_count = work_items.len(),
                orphaned_paths = ?pending.log.paths(),
                "Dataset import uploaded files but failed to persist them; \
                 storage needs reconciliation"
            );
            pending.release();
            return Err(AppError::PersistenceFailure(e.to_string()));
        }
        pending.commit();

        tracing::info!(
            project_id = %project_id,
            dataset_id = %dataset.id,
            storage_prefix = %dataset.storage_uri,
            item_count = work_items.len(),
            strategy = strategy.name(),
            "Dataset imported"
        );

        Ok(DatasetImportResponse {
            dataset_id: dataset.id,
            name: dataset.name,
            description: dataset.description,
            storage_uri: dataset.storage_uri,
            item_count: work_items.len(),
        })
    }
}

/// Objects uploaded by an import that no dataset references yet.
///
/// Dropping it while still armed (the request future was cancelled mid-processing)
/// is treated like a Processing failure: the paths are logged and, when configured,
/// removed in the background.
struct PendingUploads {
    log: UploadLog,
    project_id: Uuid,
    storage: Arc<dyn Storage>,
    cleanup_on_failure: bool,
    armed: bool,
}

impl PendingUploads {
    fn new(project_id: Uuid, storage: Arc<dyn Storage>, cleanup_on_failure: bool) -> Self {
        Self {
            log: UploadLog::new(),
            project_id,
            storage,
            cleanup_on_failure,
            armed: true,
        }
    }

    /// Processing failed; whatever was uploaded is referenced by nothing.
    fn abandon(mut self, error: &AppError) {
        self.armed = false;
        if self.log.is_empty() {
            return;
        }
        let orphaned = self.log.paths();
        tracing::warn!(
            error = %error,
            project_id = %self.project_id,
            orphaned_paths = ?orphaned,
            "Dataset import failed after uploading files"
        );
        self.schedule_cleanup(orphaned);
    }

    /// Persisting failed; the caller already logged the paths.
    fn release(mut self) {
        self.armed = false;
        let orphaned = self.log.paths();
        self.schedule_cleanup(orphaned);
    }

    fn commit(mut self) {
        self.armed = false;
    }

    fn schedule_cleanup(&self, paths: Vec<String>) {
        if !self.cleanup_on_failure || paths.is_empty() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(
                orphaned_paths = ?paths,
                "No runtime available to remove orphaned uploads"
            );
            return;
        };
        let storage = self.storage.clone();
        runtime.spawn(async move {
            for path in paths {
                match storage.delete(&path).await {
                    Ok(()) => tracing::debug!(path = %path, "Removed orphaned upload"),
                    Err(e) => {
                        tracing::warn!(error = %e, path = %path, "Failed to remove orphaned upload")
                    }
                }
            }
        });
    }
}

impl Drop for PendingUploads {
    fn drop(&mut self) {
        if !self.armed || self.log.is_empty() {
            return;
        }
        let orphaned = self.log.paths();
        tracing::warn!(
            project_id = %self.project_id,
            orphaned_paths = ?orphaned,
            "Dataset import cancelled after uploading files"
        );
        self.schedule_cleanup(orphaned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use labelhub_db::test_helpers::{MockDatasetStore, MockProjectDirectory};
    use labelhub_processing::{ProcessingOptions, UploadedFile};
    use labelhub_storage::test_helpers::MockStorage;
    use std::io::Write;
    use std::time::Duration;

    struct Harness {
        project_id: Uuid,
        member: Principal,
        storage: Arc<MockStorage>,
        datasets: Arc<MockDatasetStore>,
        service: DatasetImportService,
    }

    fn harness_with(
        storage: MockStorage,
        datasets: MockDatasetStore,
        options: ImportOptions,
    ) -> Harness {
        let project_id = Uuid::new_v4();
        let member = Principal::new(Uuid::new_v4(), vec!["labeler".to_string()]);
        let projects = MockProjectDirectory::new().with_member(project_id, member.user_id);
        let storage = Arc::new(storage);
        let datasets = Arc::new(datasets);
        let service = DatasetImportService::new(
            Arc::new(projects),
            datasets.clone(),
            storage.clone(),
            StrategyDispatcher::new(storage.clone(), ProcessingOptions::default()),
            options,
        );
        Harness {
            project_id,
            member,
            storage,
            datasets,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(
            MockStorage::new(),
            MockDatasetStore::new(),
            ImportOptions::default(),
        )
    }

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Bytes {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    fn request(project_id: Uuid, file: UploadedFile, name: Option<&str>) -> ImportRequest {
        ImportRequest {
            project_id,
            file: Some(file),
            name: name.map(String::from),
            description: None,
        }
    }

    fn jpeg(name: &str) -> UploadedFile {
        UploadedFile::new(name, Some("image/jpeg".into()), Bytes::from_static(b"x"))
    }

    /// Third path segment of `project-{id}/{dataset}/{random}/{file}`
    fn subfolder(path: &str) -> String {
        path.split('/').nth(2).unwrap().to_string()
    }

    #[tokio::test]
    async fn test_member_imports_single_image_with_default_name() {
        let h = harness();
        let file = UploadedFile::new(
            "cat.jpg",
            Some("image/jpeg".to_string()),
            Bytes::from_static(b"jpeg"),
        );

        let response = h
            .service
            .import(Some(&h.member), request(h.project_id, file, None))
            .await
            .unwrap();

        assert_eq!(response.name, "cat-import");
        assert_eq!(response.item_count, 1);
        assert_eq!(
            response.storage_uri,
            format!("project-{}/cat-import", h.project_id)
        );

        let imports = h.datasets.imports();
        assert_eq!(imports.len(), 1);
        let (dataset, items) = &imports[0];
        assert_eq!(dataset.id, response.dataset_id);
        assert_eq!(dataset.version_number, 1);
        assert_eq!(dataset.created_by, h.member.user_id);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, "unstarted");
        assert_eq!(
            items[0].scope_uri,
            MockStorage::location_for(&h.storage.uploaded_paths()[0])
        );
        assert!(h
            .storage
            .folders()
            .contains(&format!("project-{}", h.project_id)));
    }

    #[tokio::test]
    async fn test_archive_import_shares_one_subfolder_in_order() {
        let h = harness();
        let archive = zip_bytes(&[("1.png", b"one"), ("2.png", b"two"), ("3.jpg", b"three")]);
        let file = UploadedFile::new("photos.zip", Some("application/zip".to_string()), archive);

        let response = h
            .service
            .import(Some(&h.member), request(h.project_id, file, Some("batch1")))
            .await
            .unwrap();

        assert_eq!(response.item_count, 3);
        assert_eq!(response.name, "batch1");
        assert_eq!(response.storage_uri, format!("project-{}/batch1", h.project_id));

        let (_, items) = &h.datasets.imports()[0];
        let paths = h.storage.uploaded_paths();
        let shared = subfolder(&paths[0]);
        assert!(paths.iter().all(|p| subfolder(p) == shared));
        let names: Vec<_> = paths.iter().map(|p| p.rsplit('/').next().unwrap()).collect();
        assert_eq!(names, vec!["1.png", "2.png", "3.jpg"]);
        let positions: Vec<_> = items.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(items
            .iter()
            .zip(&paths)
            .all(|(item, path)| item.scope_uri == MockStorage::location_for(path)));
    }

    #[tokio::test]
    async fn test_mixed_archive_fails_without_side_effects() {
        let h = harness();
        let archive = zip_bytes(&[("a.png", b"png"), ("b.txt", b"text")]);
        let file = UploadedFile::new("mix.zip", None, archive);

        let err = h
            .service
            .import(Some(&h.member), request(h.project_id, file, None))
            .await
            .unwrap_err();

        match err {
            AppError::InvalidInput(message) => {
                assert_eq!(message, "Archive must contain only images OR only text files")
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert_eq!(h.storage.upload_attempts(), 0);
        assert!(h.datasets.imports().is_empty());
    }

    #[tokio::test]
    async fn test_outsider_is_forbidden_without_side_effects() {
        let h = harness();
        let outsider = Principal::new(Uuid::new_v4(), vec!["labeler".to_string()]);
        let file = jpeg("cat.jpg");

        let err = h
            .service
            .import(Some(&outsider), request(h.project_id, file, None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(h.storage.folders().is_empty());
        assert_eq!(h.storage.upload_attempts(), 0);
        assert!(h.datasets.imports().is_empty());
    }

    #[tokio::test]
    async fn test_storage_rejection_mid_archive_persists_nothing() {
        let h = harness_with(
            MockStorage::new().failing_on_upload(2),
            MockDatasetStore::new(),
            ImportOptions::default(),
        );
        let archive = zip_bytes(&[("1.png", b"one"), ("2.png", b"two"), ("3.png", b"three")]);
        let file = UploadedFile::new("photos.zip", None, archive);

        let err = h
            .service
            .import(Some(&h.member), request(h.project_id, file, None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StorageFailure(_)));
        assert_eq!(h.storage.uploaded_paths().len(), 1);
        assert!(h.datasets.imports().is_empty());
        assert!(h.storage.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_privileged_non_member_may_import() {
        let h = harness();
        let manager = Principal::new(Uuid::new_v4(), vec!["manager".to_string()]);
        let file = UploadedFile::new("notes.txt", None, Bytes::from_static(b"hello"));

        let response = h
            .service
            .import(Some(&manager), request(h.project_id, file, None))
            .await
            .unwrap();
        assert_eq!(response.name, "notes-import");
        assert_eq!(h.storage.uploads()[0].content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_missing_project_is_not_found() {
        let h = harness();
        let file = jpeg("cat.jpg");

        let err = h
            .service
            .import(Some(&h.member), request(Uuid::new_v4(), file, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_file_and_principal() {
        let h = harness();
        let err = h
            .service
            .import(
                Some(&h.member),
                ImportRequest {
                    project_id: h.project_id,
                    file: None,
                    name: None,
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let file = jpeg("cat.jpg");
        let err = h
            .service
            .import(None, request(h.project_id, file, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        assert!(h.storage.folders().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected_before_side_effects() {
        let h = harness();
        let file = UploadedFile::new(
            "clip.mp4",
            Some("video/mp4".to_string()),
            Bytes::from_static(b"mp4"),
        );

        let err = h
            .service
            .import(Some(&h.member), request(h.project_id, file, None))
            .await
            .unwrap_err();
        match err {
            AppError::InvalidInput(message) => {
                assert_eq!(message, "No upload strategy can handle this file type")
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(h.storage.folders().is_empty());
    }

    #[tokio::test]
    async fn test_folder_failure_inside_strategy_aborts() {
        let h = harness_with(
            MockStorage::new().failing_ensure_folder(),
            MockDatasetStore::new(),
            ImportOptions::default(),
        );
        let file = UploadedFile::new("cat.png", Some("image/png".into()), Bytes::from_static(b"x"));

        // The project folder call is best-effort; the upload folder call is not.
        let err = h
            .service
            .import(Some(&h.member), request(h.project_id, file, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StorageFailure(_)));
        assert_eq!(h.storage.upload_attempts(), 0);
        assert!(h.datasets.imports().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_reports_and_cleans_up() {
        let h = harness_with(
            MockStorage::new(),
            MockDatasetStore::failing(),
            ImportOptions {
                cleanup_on_failure: true,
                ..ImportOptions::default()
            },
        );
        let archive = zip_bytes(&[("a.txt", b"a"), ("b.json", b"{}")]);
        let file = UploadedFile::new("docs.zip", None, archive);

        let err = h
            .service
            .import(Some(&h.member), request(h.project_id, file, None))
            .await
            .unwrap_err();

        match err {
            AppError::PersistenceFailure(message) => {
                assert!(message.contains("connection reset"))
            }
            other => panic!("Expected PersistenceFailure, got {:?}", other),
        }

        assert_eq!(h.storage.upload_attempts(), 2);
        for _ in 0..50 {
            if h.storage.deletes().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let deleted = h.storage.deletes();
        assert_eq!(deleted.len(), 2);
        assert!(deleted[0].ends_with("/a.txt"));
        assert!(deleted[1].ends_with("/b.json"));
        assert!(h.storage.uploaded_paths().is_empty());
    }

    #[tokio::test]
    async fn test_processing_timeout() {
        let h = harness_with(
            MockStorage::new().with_upload_delay(Duration::from_millis(500)),
            MockDatasetStore::new(),
            ImportOptions {
                timeout: Duration::from_millis(20),
                cleanup_on_failure: false,
            },
        );
        let file = jpeg("cat.jpg");

        let err = h
            .service
            .import(Some(&h.member), request(h.project_id, file, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
        assert!(h.datasets.imports().is_empty());
    }

    #[tokio::test]
    async fn test_blank_description_dropped() {
        let h = harness();
        let file = jpeg("cat.jpg");
        let mut req = request(h.project_id, file, Some("  "));
        req.description = Some("  ".to_string());

        let response = h.service.import(Some(&h.member), req).await.unwrap();
        assert_eq!(response.name, "cat-import");
        assert!(response.description.is_none());
    }

    #[tokio::test]
    async fn test_name_and_description_kept_as_given() {
        let h = harness();
        let file = jpeg("cat.jpg");
        let mut req = request(h.project_id, file, Some(" batch1"));
        req.description = Some(" first batch ".to_string());

        let response = h.service.import(Some(&h.member), req).await.unwrap();
        assert_eq!(response.name, " batch1");
        assert_eq!(response.description.as_deref(), Some(" first batch "));
        assert_eq!(
            response.storage_uri,
            format!("project-{}/ batch1", h.project_id)
        );
    }

    #[tokio::test]
    async fn test_cancelled_import_cleans_up_uploaded_entries() {
        let h = harness_with(
            MockStorage::new().with_upload_delay(Duration::from_millis(50)),
            MockDatasetStore::new(),
            ImportOptions {
                cleanup_on_failure: true,
                ..ImportOptions::default()
            },
        );
        let archive = zip_bytes(&[
            ("1.png", b"one"),
            ("2.png", b"two"),
            ("3.png", b"three"),
            ("4.png", b"four"),
        ]);
        let file = UploadedFile::new("photos.zip", None, archive);

        // Dropping the future mid-archive is what a client disconnect does.
        let outcome = tokio::time::timeout(
            Duration::from_millis(120),
            h.service
                .import(Some(&h.member), request(h.project_id, file, None)),
        )
        .await;
        assert!(outcome.is_err());

        for _ in 0..50 {
            if !h.storage.deletes().is_empty() && h.storage.uploaded_paths().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let deleted = h.storage.deletes();
        assert!(!deleted.is_empty());
        assert!(deleted.len() < 4);
        assert!(deleted[0].ends_with("/1.png"));
        assert!(h.storage.uploaded_paths().is_empty());
        assert!(h.datasets.imports().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_import_without_cleanup_keeps_objects() {
        let h = harness_with(
            MockStorage::new().with_upload_delay(Duration::from_millis(50)),
            MockDatasetStore::new(),
            ImportOptions::default(),
        );
        let archive = zip_bytes(&[("1.png", b"one"), ("2.png", b"two"), ("3.png", b"three")]);
        let file = UploadedFile::new("photos.zip", None, archive);

        let outcome = tokio::time::timeout(
            Duration::from_millis(80),
            h.service
                .import(Some(&h.member), request(h.project_id, file, None)),
        )
        .await;
        assert!(outcome.is_err());

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(h.storage.deletes().is_empty());
        let kept = h.storage.uploaded_paths().len();
        assert!(kept >= 1 && kept < 3);
    }
}
