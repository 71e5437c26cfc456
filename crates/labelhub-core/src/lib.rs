//! LabelHub Core Library
//!
//! Domain models, error types, configuration and constants shared by every
//! LabelHub crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::{BaseConfig, Config, ImportServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
