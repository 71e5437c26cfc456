use labelhub_processing::UploadedFile;
use std::time::Duration;
use uuid::Uuid;

/// Input of one import
#[derive(Clone, Debug)]
pub struct ImportRequest {
    pub project_id: Uuid,
    pub file: Option<UploadedFile>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct ImportOptions {
    /// Deadline for the Processing state
    pub timeout: Duration,
    /// Delete already-uploaded objects when an import fails
    pub cleanup_on_failure: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(600),
            cleanup_on_failure: false,
        }
    }
}
