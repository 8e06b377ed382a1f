use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::{
    auth_handlers, message_handlers, middleware as guards, user_handlers, AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/users/admins", get(user_handlers::list_admins))
        .route("/users/clients", get(user_handlers::list_clients))
        .route("/users/{user_id}", get(user_handlers::get_user))
        .route("/health", get(health));

    // Identity only: the token must name a live account.
    let identified_routes = Router::new()
        .route("/users/me", get(user_handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guards::require_auth,
        ));

    // Identity plus the active flag.
    let active_routes = Router::new()
        .route("/messages/history", get(message_handlers::history))
        .route("/messages/send", post(message_handlers::send))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guards::require_active,
        ));

    Router::new()
        .merge(public_routes)
        .merge(identified_routes)
        .merge(active_routes)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
