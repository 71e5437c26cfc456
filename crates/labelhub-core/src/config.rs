//! Configuration module
//!
//! Settings are read from the environment (after loading `.env` through `dotenvy`).
//! [`Config`] wraps the import service configuration and exposes getters so callers
//! never reach into the nested structs directly.

use std::env;

use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 5000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_UPLOAD_SIZE_MB: usize = 200;
const IMPORT_TIMEOUT_SECS: u64 = 600;
const IMPORT_UPLOAD_CONCURRENCY: usize = 1;
const STORAGE_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Server-wide settings independent of the import pipeline
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub environment: String,
    pub log_format: String,
}

/// Dataset import service configuration
#[derive(Clone, Debug)]
pub struct ImportServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub run_migrations: bool,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub supabase_url: Option<String>,
    pub supabase_api_key: Option<String>,
    pub supabase_bucket: Option<String>,
    pub supabase_use_public_url: bool,
    pub storage_request_timeout_secs: u64,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, R2, ...)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Import pipeline
    pub max_upload_size_bytes: usize,
    pub import_timeout_secs: u64,
    pub import_upload_concurrency: usize,
    pub import_cleanup_on_failure: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ImportServiceConfig>);

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| parse_flag(&v).unwrap_or(default))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Config {
    fn inner(&self) -> &ImportServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ImportServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_issuer(&self) -> Option<&str> {
        self.inner().base.jwt_issuer.as_deref()
    }

    pub fn jwt_audience(&self) -> Option<&str> {
        self.inner().base.jwt_audience.as_deref()
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn run_migrations(&self) -> bool {
        self.inner().run_migrations
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn supabase_url(&self) -> Option<&str> {
        self.inner().supabase_url.as_deref()
    }

    pub fn supabase_api_key(&self) -> Option<&str> {
        self.inner().supabase_api_key.as_deref()
    }

    pub fn supabase_bucket(&self) -> Option<&str> {
        self.inner().supabase_bucket.as_deref()
    }

    pub fn supabase_use_public_url(&self) -> bool {
        self.inner().supabase_use_public_url
    }

    pub fn storage_request_timeout_secs(&self) -> u64 {
        self.inner().storage_request_timeout_secs
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn import_timeout_secs(&self) -> u64 {
        self.inner().import_timeout_secs
    }

    pub fn import_upload_concurrency(&self) -> usize {
        self.inner().import_upload_concurrency
    }

    pub fn import_cleanup_on_failure(&self) -> bool {
        self.inner().import_cleanup_on_failure
    }
}

impl ImportServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),
            environment,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "compact".to_string())
                .to_lowercase(),
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Supabase,
        };

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        Ok(ImportServiceConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            run_migrations: env_flag("RUN_MIGRATIONS", true),
            storage_backend,
            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_api_key: env::var("SUPABASE_API_KEY").ok(),
            supabase_bucket: env::var("SUPABASE_BUCKET").ok(),
            supabase_use_public_url: env_flag("SUPABASE_USE_PUBLIC_URL", true),
            storage_request_timeout_secs: env::var("STORAGE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(STORAGE_REQUEST_TIMEOUT_SECS),
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            import_timeout_secs: env::var("IMPORT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(IMPORT_TIMEOUT_SECS),
            import_upload_concurrency: env::var("IMPORT_UPLOAD_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(IMPORT_UPLOAD_CONCURRENCY),
            import_cleanup_on_failure: env_flag("IMPORT_CLEANUP_ON_FAILURE", false),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.import_upload_concurrency == 0 {
            return Err(anyhow::anyhow!(
                "IMPORT_UPLOAD_CONCURRENCY must be at least 1"
            ));
        }

        if self.import_timeout_secs == 0 {
            return Err(anyhow::anyhow!("IMPORT_TIMEOUT_SECS must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::Supabase => {
                if self.supabase_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL must be set when using Supabase storage backend"
                    ));
                }
                if self.supabase_api_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_API_KEY must be set when using Supabase storage backend"
                    ));
                }
                if self.supabase_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_BUCKET must be set when using Supabase storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
