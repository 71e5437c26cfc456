//! LabelHub database layer
//!
//! PostgreSQL repositories for projects, memberships, datasets and work items,
//! plus the narrow traits the import service depends on.

pub mod db;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use db::{DatasetRepository, DatasetStore, ProjectDirectory, ProjectRepository};
