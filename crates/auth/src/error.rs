use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; callers must not learn which.
    #[error("Could not validate credentials")]
    InvalidCredentials,

    /// Bad signature, malformed payload, missing subject, expired, or a
    /// subject that no longer maps to an account.
    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("Inactive user")]
    Inactive,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("token signing failed: {0}")]
    TokenSigning(String),

    #[error("unsupported signing algorithm: {0:?}")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),

    #[error(transparent)]
    Store(#[from] storage::StoreError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
