pub mod auth_handlers;
pub mod error;
pub mod message_handlers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod user_handlers;

pub use error::ApiError;
pub use state::AppState;
