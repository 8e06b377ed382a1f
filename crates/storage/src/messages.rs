use chrono::Utc;
use sqlx::SqlitePool;

use crate::model::{Message, NewMessage};
use crate::{Result, StoreError};

/// Repository over the `messages` table.
#[derive(Clone)]
pub struct MessageRepo {
    pool: SqlitePool,
}

impl MessageRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a message in one transactional scope.
    ///
    /// An addressed message requires its receiver to exist at insert time;
    /// the early return rolls the transaction back on drop.
    pub async fn send(&self, new: &NewMessage) -> Result<Message> {
        let mut tx = self.pool.begin().await?;

        if let Some(receiver_id) = new.receiver_id {
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
                .bind(receiver_id)
                .fetch_one(&mut *tx)
                .await?;
            if exists == 0 {
                return Err(StoreError::UnknownReceiver);
            }
        }

        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (sender_id, receiver_id, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, sender_id, receiver_id, content, created_at
            "#,
        )
        .bind(new.sender_id)
        .bind(new.receiver_id)
        .bind(&new.content)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Newest-first page of messages. No cursor; a single bounded page.
    pub async fn list_recent(&self, limit: u32) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, receiver_id, content, created_at
            FROM messages
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }
}
