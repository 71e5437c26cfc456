use crate::auth::jwt::JwtService;
use crate::auth::models::Principal;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use labelhub_core::AppError;
use std::sync::Arc;

/// Attach the caller's [`Principal`] to the request when an `Authorization` header
/// is present.
///
/// A present but invalid token is rejected here with 401. A missing header passes
/// through; the handler decides whether anonymous access is allowed.
pub async fn auth_middleware(
    State(jwt): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(value) => Some(value.to_string()),
            Err(_) => {
                return HttpAppError(AppError::Unauthorized(
                    "Authorization header is not valid UTF-8".to_string(),
                ))
                .into_response();
            }
        },
    };

    if let Some(header) = header {
        match jwt.verify(&header) {
            Ok(principal) => {
                tracing::debug!(user_id = %principal.user_id, "Authenticated request");
                request.extensions_mut().insert::<Principal>(principal);
            }
            Err(e) => return HttpAppError(e).into_response(),
        }
    }

    next.run(request).await
}
