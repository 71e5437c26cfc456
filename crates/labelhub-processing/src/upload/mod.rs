//! Upload strategies and their dispatcher.
//!
//! Every strategy stores files under
//! `project-{project_id}/{dataset_name}/{random_id}/{filename}` and reports the
//! dataset prefix `project-{project_id}/{dataset_name}`.

mod archive;
pub mod classify;
mod dispatcher;
mod image;
mod single;
mod text;
pub mod types;

pub use archive::ArchiveStrategy;
pub use dispatcher::{StrategyDispatcher, UploadStrategy};
pub use image::ImageStrategy;
pub use single::stored_file_name;
pub use text::TextStrategy;
pub use types::{ProcessingOptions, UploadLog, UploadedFile};
