//! Shared flow of the single-file strategies.

use labelhub_core::models::{FileItem, ImportResult};
use labelhub_core::AppError;
use labelhub_storage::{paths, Storage};
use uuid::Uuid;

use super::classify;
use super::types::{UploadLog, UploadedFile};

/// Base name of a declared filename, rejecting names that cannot be stored.
pub fn stored_file_name(declared: &str) -> Result<String, AppError> {
    let name = classify::base_name(declared.trim());
    if name.is_empty() || name == "." || name == ".." {
        return Err(AppError::InvalidInput(format!(
            "Invalid file name: {:?}",
            declared
        )));
    }
    Ok(name.to_string())
}

/// Store one file under a fresh subfolder and describe it as a one-item import.
pub(crate) async fn store_single_file(
    storage: &dyn Storage,
    file: &UploadedFile,
    project_id: Uuid,
    dataset_name: &str,
    fallback_content_type: &str,
    log: &UploadLog,
) -> Result<ImportResult, AppError> {
    let filename = stored_file_name(&file.filename)?;
    let content_type = file
        .declared_content_type()
        .unwrap_or(fallback_content_type)
        .to_string();

    let folder = paths::new_upload_folder(project_id, dataset_name);
    storage.ensure_folder(&folder).await?;

    let path = paths::object_path(&folder, &filename);
    let location = storage
        .upload(&path, &content_type, file.data.clone())
        .await?;
    log.record(path.clone());

    tracing::debug!(
        project_id = %project_id,
        path = %path,
        size_bytes = file.size(),
        "Stored single file"
    );

    Ok(ImportResult {
        items: vec![FileItem {
            name: filename,
            content_type,
            storage_location: location,
        }],
        storage_prefix: paths::dataset_prefix(project_id, dataset_name),
    })
}
