//! HS256 token verification

use crate::auth::models::{JwtClaims, Principal};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use labelhub_core::AppError;

const BEARER_PREFIX: &str = "Bearer ";

/// Verifies bearer tokens signed with the shared `JWT_SECRET`
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// `issuer` and `audience` are only checked when configured.
    pub fn new(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify an `Authorization` header value. The `Bearer ` prefix is optional.
    pub fn verify(&self, header_value: &str) -> Result<Principal, AppError> {
        let token = strip_bearer(header_value);
        if token.is_empty() {
            return Err(AppError::Unauthorized("Missing bearer token".to_string()));
        }

        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT verification failed");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(Principal::from(data.claims))
    }
}

fn strip_bearer(header_value: &str) -> &str {
    let value = header_value.trim();
    match value.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            value[BEARER_PREFIX.len()..].trim()
        }
        _ => value,
    }
}
