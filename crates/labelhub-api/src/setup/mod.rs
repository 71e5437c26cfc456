//! Application setup and initialization

pub mod database;
pub mod health;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtService;
use crate::services::{DatasetImportService, ImportOptions};
use crate::state::{AppState, DbState};
use anyhow::{Context, Result};
use labelhub_core::Config;
use labelhub_db::{DatasetRepository, ProjectRepository};
use labelhub_processing::{ProcessingOptions, StrategyDispatcher};
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;

    let dispatcher = StrategyDispatcher::new(
        storage.clone(),
        ProcessingOptions {
            upload_concurrency: config.import_upload_concurrency(),
            max_entry_bytes: config.max_upload_size_bytes() as u64,
        },
    );
    let imports = DatasetImportService::new(
        Arc::new(ProjectRepository::new(pool.clone())),
        Arc::new(DatasetRepository::new(pool.clone())),
        storage,
        dispatcher,
        ImportOptions {
            timeout: Duration::from_secs(config.import_timeout_secs()),
            cleanup_on_failure: config.import_cleanup_on_failure(),
        },
    );

    let state = Arc::new(AppState {
        auth: Arc::new(JwtService::new(
            config.jwt_secret(),
            config.jwt_issuer(),
            config.jwt_audience(),
        )),
        db: DbState { pool },
        imports: Arc::new(imports),
        config,
    });

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
