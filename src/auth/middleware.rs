//! Bearer credential extraction for the HTTP surface.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::AppState;

use super::verifier::{Principal, ResolveError};

/// Authenticated principal extracted from `Authorization: Bearer <token>`.
///
/// Goes through the same resolver chain as the gateway handshake, so both
/// token schemes work on every protected route.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub principal: Principal,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let principal = state.resolver.resolve(token).await.map_err(|err| match err {
            ResolveError::Unauthenticated => ApiError::unauthorized("Missing bearer token"),
            ResolveError::InvalidCredential(reasons) => {
                tracing::debug!(%reasons, "bearer credential rejected");
                ApiError::unauthorized("Invalid credential")
            }
        })?;

        Ok(AuthUser { principal })
    }
}
