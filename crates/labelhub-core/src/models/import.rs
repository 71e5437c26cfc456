use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One stored artifact produced by an upload strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub name: String,
    pub content_type: String,
    pub storage_location: String,
}

/// Output of every upload strategy: the stored files, in processing order, and
/// the folder they were placed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub items: Vec<FileItem>,
    pub storage_prefix: String,
}

/// Optional form fields accompanying the uploaded file
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct DatasetImportRequest {
    #[serde(default)]
    #[validate(length(
        max = 255,
        message = "Dataset name must be at most 255 characters"
    ))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(
        max = 2000,
        message = "Description must be at most 2000 characters"
    ))]
    pub description: Option<String>,
}

/// Summary returned after a successful import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetImportResponse {
    pub dataset_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub storage_uri: String,
    pub item_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_response_uses_camel_case() {
        let response = DatasetImportResponse {
            dataset_id: Uuid::nil(),
            name: "cat-import".to_string(),
            description: None,
            storage_uri: "project-1/cat-import".to_string(),
            item_count: 1,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["datasetId"], Uuid::nil().to_string());
        assert_eq!(json["storageUri"], "project-1/cat-import");
        assert_eq!(json["itemCount"], 1);
    }

    #[test]
    fn test_request_validation_limits() {
        let request = DatasetImportRequest {
            name: Some("a".repeat(256)),
            description: None,
        };
        assert!(request.validate().is_err());

        let request = DatasetImportRequest {
            name: Some("batch1".to_string()),
            description: Some("first batch".to_string()),
        };
        assert!(request.validate().is_ok());
    }
}
