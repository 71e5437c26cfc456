//! LabelHub Processing Library
//!
//! Upload strategies for dataset imports: single images, single text files and
//! zip/rar archives, plus the dispatcher that picks exactly one of them per file.

pub mod archive;
pub mod upload;

pub use archive::{ArchiveEntry, ArchiveError, ArchiveFormat};
pub use upload::{
    ArchiveStrategy, ImageStrategy, ProcessingOptions, StrategyDispatcher, TextStrategy,
    UploadLog, UploadStrategy, UploadedFile,
};
