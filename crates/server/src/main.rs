mod seed;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use api::{router::router, AppState};
use auth::{Algorithm, AuthService, TokenService};
use soporteit_core::AppConfig;
use storage::{MessageRepo, UserRepo};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    let pool = storage::connect(&config.database.url, config.database.max_connections)
        .await
        .context("failed to open database")?;
    storage::init_schema(&pool)
        .await
        .context("failed to initialize schema")?;

    let algorithm = Algorithm::from_str(&config.auth.algorithm)
        .map_err(|_| anyhow::anyhow!("unknown signing algorithm: {}", config.auth.algorithm))?;
    let tokens = TokenService::new(&config.auth.secret_key, algorithm, config.auth.token_ttl_minutes)?;

    let users = UserRepo::new(pool.clone());
    let messages = MessageRepo::new(pool);
    let auth_service = AuthService::new(users.clone(), tokens);

    seed::ensure_bootstrap_admin(&auth_service, &users, config.bootstrap.as_ref()).await?;

    let state = Arc::new(AppState::new(auth_service, users, messages));
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}
