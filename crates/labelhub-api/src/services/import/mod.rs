//! Dataset import orchestration
//!
//! One import walks `Validating → Authorizing → FolderEnsuring → Processing →
//! Persisting → Done`. Anything before Processing has no side effects.

mod naming;
mod service;
mod types;

pub use naming::resolve_dataset_name;
pub use service::DatasetImportService;
pub use types::{ImportOptions, ImportRequest};
