use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use labelhub_core::constants::PRIVILEGED_ROLES;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(user_id: Uuid, roles: Vec<String>) -> Self {
        Self { user_id, roles }
    }

    /// Privileged callers may import into projects they are not a member of.
    pub fn is_privileged(&self) -> bool {
        self.roles
            .iter()
            .any(|role| PRIVILEGED_ROLES.contains(&role.trim().to_lowercase().as_str()))
    }
}

impl From<JwtClaims> for Principal {
    fn from(claims: JwtClaims) -> Self {
        Principal::new(claims.sub, claims.roles)
    }
}

/// Principal placed in request extensions by the auth middleware, if any.
///
/// Never rejects: an anonymous request reaches the handler with `None` and the
/// import service answers `Unauthorized`.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Option<Principal>);

// Read from parts directly; `Extension` cannot be combined with `Multipart`.
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentPrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}
