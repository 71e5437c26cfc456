use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Labeling status of a work item. Imports only ever create `Unstarted` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemStatus {
    Unstarted,
    InProgress,
    Submitted,
    Reviewed,
}

impl WorkItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkItemStatus::Unstarted => "unstarted",
            WorkItemStatus::InProgress => "in_progress",
            WorkItemStatus::Submitted => "submitted",
            WorkItemStatus::Reviewed => "reviewed",
        }
    }
}

impl Display for WorkItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// One unit of labeling work pointing at a single stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct WorkItem {
    pub id: Uuid,
    pub dataset_id: Uuid,
    pub scope_uri: String,
    pub status: String,
    /// Zero-based index of the file in the import, preserving archive order
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl WorkItem {
    pub fn unstarted(dataset_id: Uuid, scope_uri: String, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            dataset_id,
            scope_uri,
            status: WorkItemStatus::Unstarted.as_str().to_string(),
            position,
            created_at: Utc::now(),
        }
    }
}
