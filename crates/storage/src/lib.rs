//! Datastore layer: SQLite access for user accounts and messages.
//!
//! The database is the arbiter for uniqueness; repositories translate its
//! constraint rejections into typed errors so callers never see raw driver
//! detail.

pub mod db;
pub mod messages;
pub mod model;
pub mod users;

pub use db::{connect, connect_memory, init_schema};
pub use messages::MessageRepo;
pub use model::{Message, NewMessage, NewUser, Role, User};
pub use users::UserRepo;

use thiserror::Error;

/// Field whose uniqueness constraint was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Username,
    Email,
}

impl std::fmt::Display for ConflictField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictField::Username => f.write_str("Username"),
            ConflictField::Email => f.write_str("Email"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already registered")]
    Conflict(ConflictField),

    #[error("Receiver not found")]
    UnknownReceiver,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
