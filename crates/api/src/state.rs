use auth::AuthService;
use storage::{MessageRepo, UserRepo};

/// Application state shared across all handlers.
pub struct AppState {
    pub auth: AuthService,
    pub users: UserRepo,
    pub messages: MessageRepo,
}

impl AppState {
    pub fn new(auth: AuthService, users: UserRepo, messages: MessageRepo) -> Self {
        Self {
            auth,
            users,
            messages,
        }
    }
}
