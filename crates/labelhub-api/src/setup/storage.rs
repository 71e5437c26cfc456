use anyhow::{Context, Result};
use labelhub_core::Config;
use labelhub_storage::Storage;
use std::sync::Arc;

/// Build the configured storage backend
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = labelhub_storage::create_storage(config)
        .await
        .with_context(|| format!("Failed to initialize {} storage", config.storage_backend()))?;

    tracing::info!(backend = %storage.backend_type(), "Storage initialized");
    Ok(storage)
}
