use std::sync::Arc;

use auth::Registration;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::{Role, User};

use crate::{error::ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    pub password: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let username_len = self.username.chars().count();
        if !(3..=50).contains(&username_len) {
            return Err(ApiError::Validation(
                "username must be 3-50 characters".to_string(),
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(ApiError::Validation(
                "email is not a valid address".to_string(),
            ));
        }
        if let Some(full_name) = &self.full_name {
            if full_name.chars().count() > 255 {
                return Err(ApiError::Validation(
                    "full_name must be at most 255 characters".to_string(),
                ));
            }
        }
        let password_len = self.password.chars().count();
        if !(6..=128).contains(&password_len) {
            return Err(ApiError::Validation(
                "password must be 6-128 characters".to_string(),
            ));
        }
        Ok(())
    }
}

/// Minimal syntactic check: one `@`, a non-empty local part, a dotted
/// domain, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Public view of an account; the stored hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserOut {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserOut {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let user = state
        .auth
        .register(Registration {
            username: payload.username,
            email: payload.email,
            full_name: payload.full_name,
            role: payload.role,
            password: payload.password,
        })
        .await?;

    tracing::info!(username = %user.username, role = ?user.role, "registered new account");
    Ok((StatusCode::CREATED, Json(UserOut::from(user))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let (access_token, _user) = state.auth.authenticate(&form.username, &form.password).await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}
