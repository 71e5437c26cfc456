//! LabelHub API
//!
//! HTTP surface of the dataset import pipeline: JWT principal extraction, the
//! import orchestrator and server setup.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use services::{DatasetImportService, ImportOptions, ImportRequest};
pub use state::AppState;
