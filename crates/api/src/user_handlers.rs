use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use storage::Role;

use crate::{auth_handlers::UserOut, error::ApiError, middleware::AuthUser, AppState};

pub async fn me(AuthUser(user): AuthUser) -> Json<UserOut> {
    Json(user.into())
}

pub async fn list_admins(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserOut>>, ApiError> {
    let users = state.users.list_by_role(Role::Admin).await?;
    Ok(Json(users.into_iter().map(UserOut::from).collect()))
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserOut>>, ApiError> {
    let users = state.users.list_by_role(Role::User).await?;
    Ok(Json(users.into_iter().map(UserOut::from).collect()))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserOut>, ApiError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
