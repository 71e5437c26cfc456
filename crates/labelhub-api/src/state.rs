//! Application state shared by all handlers

use crate::auth::JwtService;
use crate::services::DatasetImportService;
use labelhub_core::Config;
use sqlx::PgPool;
use std::sync::Arc;

/// Database pool, used by the readiness check. Repositories hold their own clone.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub auth: Arc<JwtService>,
    pub imports: Arc<DatasetImportService>,
}
