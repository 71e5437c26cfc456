//! Object path layout shared by every backend.
//!
//! Stored data depends on this exact layout:
//!
//! - project folder: `project-{project_id}`
//! - dataset prefix: `project-{project_id}/{dataset_name}`
//! - upload folder: `project-{project_id}/{dataset_name}/{random_id}`
//! - object: `{upload folder}/{filename}`

use crate::traits::{StorageError, StorageResult};
use uuid::Uuid;

pub fn project_folder(project_id: Uuid) -> String {
    format!("project-{}", project_id)
}

/// Common prefix of every file imported into one dataset.
pub fn dataset_prefix(project_id: Uuid, dataset_name: &str) -> String {
    format!("{}/{}", project_folder(project_id), dataset_name)
}

/// Fresh, collision-free folder for one import.
pub fn new_upload_folder(project_id: Uuid, dataset_name: &str) -> String {
    format!("{}/{}", dataset_prefix(project_id, dataset_name), Uuid::new_v4())
}

pub fn object_path(folder: &str, filename: &str) -> String {
    format!("{}/{}", folder, filename)
}

/// Reject keys that could escape the storage root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') || key.starts_with('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key must be relative".to_string(),
        ));
    }
    if key.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains path traversal".to_string(),
        ));
    }
    if key.contains('\0') {
        return Err(StorageError::InvalidKey(
            "Storage key contains a NUL byte".to_string(),
        ));
    }
    Ok(())
}
