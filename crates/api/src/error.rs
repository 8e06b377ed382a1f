use auth::AuthError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storage::StoreError;

/// Error surface of the HTTP layer; each variant is one status code, and the
/// body always carries a human-readable `detail` string.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    NotFound(String),
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(d) => (StatusCode::UNPROCESSABLE_ENTITY, d),
            ApiError::Unauthorized(d) => (StatusCode::UNAUTHORIZED, d),
            ApiError::Forbidden(d) => (StatusCode::FORBIDDEN, d),
            ApiError::Conflict(d) => (StatusCode::CONFLICT, d),
            ApiError::NotFound(d) => (StatusCode::NOT_FOUND, d),
            ApiError::Internal(d) => {
                // Log the real cause; the response body stays generic.
                tracing::error!(detail = %d, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let mut response = (status, Json(ErrorBody { detail })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Inactive => ApiError::Forbidden(err.to_string()),
            AuthError::Store(e) => e.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ApiError::Conflict(err.to_string()),
            StoreError::UnknownReceiver => ApiError::NotFound(err.to_string()),
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}
