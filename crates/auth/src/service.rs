use storage::{ConflictField, NewUser, Role, StoreError, User, UserRepo};

use crate::error::{AuthError, Result};
use crate::jwt::TokenService;
use crate::password::{hash_password, verify_password};

/// Registration input. Field constraints are checked at the API boundary
/// before this reaches the service.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub password: String,
}

/// Authentication and registration flows over the user directory.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepo,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: UserRepo, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new account.
    ///
    /// The username pre-check runs before the email pre-check, which fixes
    /// which conflict is reported when both collide. The insert itself still
    /// translates a datastore uniqueness rejection into the same `Conflict`,
    /// which settles concurrent duplicate submissions.
    pub async fn register(&self, reg: Registration) -> Result<User> {
        if self.users.find_by_username(&reg.username).await?.is_some() {
            return Err(StoreError::Conflict(ConflictField::Username).into());
        }
        if self.users.find_by_email(&reg.email).await?.is_some() {
            return Err(StoreError::Conflict(ConflictField::Email).into());
        }

        let hashed_password = hash_password(&reg.password)?;
        let user = self
            .users
            .insert(&NewUser {
                username: reg.username,
                email: reg.email,
                full_name: reg.full_name,
                role: reg.role,
                hashed_password,
            })
            .await?;

        Ok(user)
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown usernames and wrong passwords fail with the identical error,
    /// and the unknown-username path still runs the hasher so response
    /// timing does not separate the two cases.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<(String, User)> {
        let Some(user) = self.users.find_by_username(username).await? else {
            let _ = hash_password(password);
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.hashed_password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.username)?;
        Ok((token, user))
    }

    /// First guard stage: resolve a bearer token into the account it names.
    ///
    /// A valid signature whose subject no longer maps to an account fails
    /// the same way a forged token does.
    pub async fn resolve_bearer(&self, token: &str) -> Result<User> {
        let claims = self.tokens.verify(token)?;

        self.users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    /// Second guard stage: the account must not be disabled.
    pub fn require_active(user: User) -> Result<User> {
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }
}
