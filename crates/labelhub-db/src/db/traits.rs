use async_trait::async_trait;
use labelhub_core::models::{Dataset, WorkItem};
use labelhub_core::AppError;
use uuid::Uuid;

/// Read-only view of projects and memberships used during authorization
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    async fn project_exists(&self, project_id: Uuid) -> Result<bool, AppError>;

    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, AppError>;
}

/// Atomic persistence of an imported dataset
#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Insert the dataset and all of its work items in a single transaction.
    /// Either every row is committed or none is.
    async fn create_import(&self, dataset: &Dataset, work_items: &[WorkItem])
        -> Result<(), AppError>;
}
