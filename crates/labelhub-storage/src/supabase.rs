use crate::paths::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use std::time::Duration;

/// Characters left unescaped in a path segment (RFC 3986 unreserved set).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Supabase Storage REST backend
#[derive(Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
    use_public_url: bool,
}

impl SupabaseStorage {
    /// Create a new SupabaseStorage instance
    ///
    /// # Arguments
    /// * `base_url` - Project URL, e.g. "https://abc.supabase.co"
    /// * `bucket` - Target bucket
    /// * `api_key` - Service key sent as both bearer token and `apikey` header
    /// * `use_public_url` - Return the public object URL instead of `{bucket}/{path}`
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: String,
        bucket: String,
        api_key: String,
        use_public_url: bool,
        timeout: Duration,
    ) -> StorageResult<Self> {
        if bucket.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "Supabase bucket name is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(SupabaseStorage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            api_key,
            use_public_url,
        })
    }

    /// Percent-escape every segment of `path`, keeping the separators.
    fn escape_path(path: &str) -> String {
        path.split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn object_url(&self, escaped_path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            Self::escape_path(&self.bucket),
            escaped_path
        )
    }

    fn location(&self, path: &str, escaped_path: &str) -> String {
        if self.use_public_url {
            format!(
                "{}/storage/v1/object/public/{}/{}",
                self.base_url,
                Self::escape_path(&self.bucket),
                escaped_path
            )
        } else {
            format!("{}/{}", self.bucket, path)
        }
    }
}

#[async_trait]
impl Storage for SupabaseStorage {
    async fn ensure_folder(&self, path: &str) -> StorageResult<()> {
        validate_key(path)?;
        tracing::debug!(
            bucket = %self.bucket,
            path = %path,
            "Supabase folders are virtual, nothing to create"
        );
        Ok(())
    }

    async fn upload(&self, path: &str, content_type: &str, data: Bytes) -> StorageResult<String> {
        validate_key(path)?;
        let escaped = Self::escape_path(path);
        let size = data.len();
        let start = std::time::Instant::now();

        let response = self
            .client
            .put(self.object_url(&escaped))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .header("x-upsert", "true")
            .body(data)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    path = %path,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Supabase upload request failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable response body: {}>", e));
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                bucket = %self.bucket,
                path = %path,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Supabase upload rejected"
            );
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(
            bucket = %self.bucket,
            path = %path,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase upload successful"
        );

        Ok(self.location(path, &escaped))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        validate_key(path)?;
        let escaped = Self::escape_path(path);
        let start = std::time::Instant::now();

        let response = self
            .client
            .delete(self.object_url(&escaped))
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::DeleteFailed(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        tracing::info!(
            bucket = %self.bucket,
            path = %path,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Supabase delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Supabase
    }
}
