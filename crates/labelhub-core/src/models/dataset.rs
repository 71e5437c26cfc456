use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::INITIAL_DATASET_VERSION;

/// Dataset created by an import. Never mutated by the import pipeline afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Dataset {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Common folder of every stored file, `project-{project_id}/{name}`
    pub storage_uri: String,
    pub version_number: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
}

impl Dataset {
    /// Build a first-version dataset record with a fresh identifier.
    pub fn new_import(
        project_id: Uuid,
        name: String,
        description: Option<String>,
        storage_uri: String,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id,
            name,
            description,
            storage_uri,
            version_number: INITIAL_DATASET_VERSION,
            created_at: Utc::now(),
            created_by,
        }
    }
}
