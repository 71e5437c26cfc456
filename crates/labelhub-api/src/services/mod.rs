pub mod import;

pub use import::{DatasetImportService, ImportOptions, ImportRequest};
