//! In-memory repositories for service tests

use crate::db::traits::{DatasetStore, ProjectDirectory};
use async_trait::async_trait;
use labelhub_core::models::{Dataset, WorkItem};
use labelhub_core::AppError;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MockProjectDirectory {
    projects: HashSet<Uuid>,
    members: HashSet<(Uuid, Uuid)>,
}

impl MockProjectDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, project_id: Uuid, user_id: Uuid) -> Self {
        self.projects.insert(project_id);
        self.members.insert((project_id, user_id));
        self
    }
}

#[async_trait]
impl ProjectDirectory for MockProjectDirectory {
    async fn project_exists(&self, project_id: Uuid) -> Result<bool, AppError> {
        Ok(self.projects.contains(&project_id))
    }

    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        Ok(self.members.contains(&(project_id, user_id)))
    }
}

/// Records committed imports; can be told to fail every commit.
#[derive(Default)]
pub struct MockDatasetStore {
    imports: Mutex<Vec<(Dataset, Vec<WorkItem>)>>,
    fail: bool,
}

impl MockDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn imports(&self) -> Vec<(Dataset, Vec<WorkItem>)> {
        self.imports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl DatasetStore for MockDatasetStore {
    async fn create_import(
        &self,
        dataset: &Dataset,
        work_items: &[WorkItem],
    ) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Internal("connection reset by peer".to_string()));
        }
        self.imports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((dataset.clone(), work_items.to_vec()));
        Ok(())
    }
}
