use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use storage::User;

use crate::{error::ApiError, AppState};

/// Pull the bearer token out of the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}

/// First guard stage: the token must resolve to a real account. The user is
/// stored in request extensions for the handler's `AuthUser` extractor.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?.to_owned();
    let user = state.auth.resolve_bearer(&token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Both guard stages: resolve the identity, then reject disabled accounts
/// with a distinct status.
pub async fn require_active(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?.to_owned();
    let user = state.auth.resolve_bearer(&token).await?;
    let user = auth::AuthService::require_active(user)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Extractor for the user stored by the guard middleware.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
    }
}
