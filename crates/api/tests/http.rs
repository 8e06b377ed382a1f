//! Router-level tests driving the full HTTP surface against an in-memory
//! database.

use std::sync::Arc;

use api::{router::router, AppState};
use auth::{Algorithm, AuthService, TokenService};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use storage::{MessageRepo, UserRepo};
use tower::ServiceExt;

async fn test_app() -> (Router, Arc<AppState>) {
    let pool = storage::connect_memory().await.unwrap();
    storage::init_schema(&pool).await.unwrap();

    let users = UserRepo::new(pool.clone());
    let messages = MessageRepo::new(pool);
    let tokens = TokenService::new("test_secret_key", Algorithm::HS256, 60).unwrap();
    let auth = AuthService::new(users.clone(), tokens);

    let state = Arc::new(AppState::new(auth, users, messages));
    (router(state.clone()), state)
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &Router, username: &str, email: &str, role: &str) -> Response {
    let payload = json!({
        "username": username,
        "email": email,
        "role": role,
        "password": "secret123",
    });
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn login(app: &Router, username: &str, password: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!("username={username}&password={password}")))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn login_token(app: &Router, username: &str) -> String {
    let response = login(app, username, "secret123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

async fn get_with_bearer(app: &Router, uri: &str, token: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn send_message(app: &Router, token: &str, payload: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/messages/send")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn register_returns_created_without_the_hash() {
    let (app, _) = test_app().await;

    let response = register(&app, "alice", "alice@example.com", "user").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["username"], "alice");
    assert_eq!(body["role"], "user");
    assert_eq!(body["is_active"], true);
    assert!(body.get("password").is_none());
    assert!(body.get("hashed_password").is_none());
}

#[tokio::test]
async fn duplicate_registrations_conflict_by_field() {
    let (app, _) = test_app().await;
    assert_eq!(
        register(&app, "alice", "alice@example.com", "user").await.status(),
        StatusCode::CREATED
    );

    let response = register(&app, "alice", "other@example.com", "user").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["detail"], "Username already registered");

    let response = register(&app, "bob", "alice@example.com", "user").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["detail"], "Email already registered");
}

#[tokio::test]
async fn register_rejects_malformed_input() {
    let (app, _) = test_app().await;

    // Username too short.
    let response = register(&app, "al", "al@example.com", "user").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Bad email.
    let response = register(&app, "carol", "not-an-email", "user").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Role outside the enumeration fails at deserialization.
    let response = register(&app, "carol", "carol@example.com", "superuser").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, _) = test_app().await;
    register(&app, "alice", "alice@example.com", "user").await;

    let unknown = login(&app, "nouser", "anything").await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        unknown.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
    let unknown_body = body_json(unknown).await;

    let wrong = login(&app, "alice", "wrong_password").await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = body_json(wrong).await;

    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn me_requires_a_valid_bearer() {
    let (app, _) = test_app().await;
    register(&app, "alice", "alice@example.com", "user").await;
    let token = login_token(&app, "alice").await;

    let response = get_with_bearer(&app, "/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "alice");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/users/me").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_with_bearer(&app, "/users/me", "not.a.token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_listings_and_user_lookup_are_public() {
    let (app, _) = test_app().await;
    register(&app, "root", "root@example.com", "admin").await;
    let created = body_json(register(&app, "alice", "alice@example.com", "user").await).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/users/admins").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let admins = body_json(response).await;
    assert_eq!(admins.as_array().unwrap().len(), 1);
    assert_eq!(admins[0]["username"], "root");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/users/clients").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let clients = body_json(response).await;
    assert_eq!(clients.as_array().unwrap().len(), 1);
    assert_eq!(clients[0]["username"], "alice");

    let id = created["id"].as_i64().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/users/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["username"], "alice");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/users/999999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn send_and_list_messages() {
    let (app, _) = test_app().await;
    register(&app, "alice", "alice@example.com", "user").await;
    let bob = body_json(register(&app, "bob", "bob@example.com", "user").await).await;
    let token = login_token(&app, "alice").await;

    // Broadcast: receiver stays unset.
    let response = send_message(&app, &token, json!({ "content": "hello all" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["receiver_id"], Value::Null);

    // Addressed to a real account.
    let bob_id = bob["id"].as_i64().unwrap();
    let response = send_message(
        &app,
        &token,
        json!({ "content": "hi bob", "receiver_id": bob_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Addressed to nobody.
    let response = send_message(
        &app,
        &token,
        json!({ "content": "hi ghost", "receiver_id": 999999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Receiver not found");

    for i in 3..=5 {
        send_message(&app, &token, json!({ "content": format!("message {i}") })).await;
    }

    let response = get_with_bearer(&app, "/messages/history?limit=3", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    let page = page.as_array().unwrap();
    assert_eq!(page.len(), 3);
    assert_eq!(page[0]["content"], "message 5");
    assert!(page[0]["id"].as_i64() > page[1]["id"].as_i64());
    assert!(page[1]["id"].as_i64() > page[2]["id"].as_i64());

    let response = get_with_bearer(&app, "/messages/history?limit=0", &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let response = get_with_bearer(&app, "/messages/history?limit=300", &token).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn message_content_bounds_are_enforced() {
    let (app, _) = test_app().await;
    register(&app, "alice", "alice@example.com", "user").await;
    let token = login_token(&app, "alice").await;

    let response = send_message(&app, &token, json!({ "content": "" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send_message(&app, &token, json!({ "content": "x".repeat(1001) })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn disabled_account_is_forbidden_not_unauthorized() {
    let (app, state) = test_app().await;
    let created = body_json(register(&app, "alice", "alice@example.com", "user").await).await;
    let token = login_token(&app, "alice").await;

    state
        .users
        .set_active(created["id"].as_i64().unwrap(), false)
        .await
        .unwrap();

    // Identity still resolves, so the identity-only route answers.
    let response = get_with_bearer(&app, "/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Routes that require an active account answer 403, not 401.
    let response = get_with_bearer(&app, "/messages/history", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["detail"], "Inactive user");

    let response = send_message(&app, &token, json!({ "content": "hi" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
