use auth::{AuthError, AuthService, Registration};
use soporteit_core::BootstrapConfig;
use storage::{Role, StoreError, UserRepo};

/// Create the configured admin account if no admin exists yet.
pub async fn ensure_bootstrap_admin(
    auth: &AuthService,
    users: &UserRepo,
    bootstrap: Option<&BootstrapConfig>,
) -> anyhow::Result<()> {
    let Some(bootstrap) = bootstrap else {
        return Ok(());
    };

    if users.count_by_role(Role::Admin).await? > 0 {
        return Ok(());
    }

    let result = auth
        .register(Registration {
            username: bootstrap.admin_username.clone(),
            email: bootstrap.admin_email.clone(),
            full_name: None,
            role: Role::Admin,
            password: bootstrap.admin_password.clone(),
        })
        .await;

    match result {
        Ok(user) => {
            tracing::info!(username = %user.username, "created bootstrap admin");
            Ok(())
        }
        // Lost a race with another process; an admin exists now.
        Err(AuthError::Store(StoreError::Conflict(_))) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
