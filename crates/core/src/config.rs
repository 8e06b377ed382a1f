use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Process configuration, loaded once at startup and handed to components
/// by value. Nothing re-reads it after construction.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Optional admin account created at startup when no admin exists yet.
#[derive(Debug, Deserialize, Clone)]
pub struct BootstrapConfig {
    pub admin_username: String,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_token_ttl_minutes() -> i64 {
    60
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl AppConfig {
    /// Load configuration from `soporteit.toml` in the working directory,
    /// with `SOPORTEIT_`-prefixed environment overrides.
    ///
    /// Nested keys use `__` in the variable name, e.g.
    /// `SOPORTEIT_DATABASE__URL` or `SOPORTEIT_AUTH__SECRET_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("soporteit").required(false))
            .add_source(Environment::with_prefix("SOPORTEIT").separator("__"))
            .build()?
            .try_deserialize()
    }
}
