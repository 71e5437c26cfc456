//! Database repositories for data access layer
//!
//! Each repository owns one aggregate. The import service only sees the
//! [`ProjectDirectory`] and [`DatasetStore`] traits.

pub mod dataset;
pub mod project;
pub mod traits;

pub use dataset::DatasetRepository;
pub use project::ProjectRepository;
pub use traits::{DatasetStore, ProjectDirectory};
