pub mod config;

pub use config::{AppConfig, AuthConfig, BootstrapConfig, DatabaseConfig, ServerConfig};
