use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

/// The caller behind a valid `Authorization: Bearer <token>` header.
///
/// Only identifies the caller. Handlers that need user data load it from the
/// repository themselves so they never act on a stale copy.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
}

/// Token from an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        let data = state.jwt_service.verify_access_token(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            ApiError::Unauthorized
        })?;

        Ok(AuthUser {
            user_id: data.claims.sub,
            username: data.claims.username,
        })
    }
}
