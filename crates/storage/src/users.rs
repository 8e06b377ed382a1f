use chrono::Utc;
use sqlx::SqlitePool;

use crate::model::{NewUser, Role, User};
use crate::{ConflictField, Result, StoreError};

const USER_COLUMNS: &str =
    "id, username, email, full_name, hashed_password, role, is_active, created_at";

/// Repository over the `users` table.
#[derive(Clone)]
pub struct UserRepo {
    pool: SqlitePool,
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account in its own transactional scope.
    ///
    /// When two registrations race past the pre-checks, the database rejects
    /// the second writer; that rejection maps to the same `Conflict` a
    /// pre-check would have produced.
    pub async fn insert(&self, new: &NewUser) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, full_name, hashed_password, role, is_active, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(new.full_name.as_deref())
        .bind(&new.hashed_password)
        .bind(new.role)
        .bind(true)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(translate_unique_violation)?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = ? ORDER BY id"
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn count_by_role(&self, role: Role) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Flip the active flag. Administrative hook; accounts are never
    /// hard-deleted.
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn translate_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = if db.message().contains("users.email") {
                ConflictField::Email
            } else {
                ConflictField::Username
            };
            return StoreError::Conflict(field);
        }
    }
    StoreError::Database(err)
}
