//! Data models for the dataset import pipeline
//!
//! Persisted entities (projects, datasets, work items) and the ephemeral
//! contracts exchanged between the upload strategies and the orchestrator.

mod dataset;
mod import;
mod project;
mod work_item;

pub use dataset::Dataset;
pub use import::{DatasetImportRequest, DatasetImportResponse, FileItem, ImportResult};
pub use project::Project;
pub use work_item::{WorkItem, WorkItemStatus};
