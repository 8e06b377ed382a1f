use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storage::{Message, NewMessage};

use crate::{error::ApiError, middleware::AuthUser, AppState};

const DEFAULT_HISTORY_LIMIT: u32 = 50;
const MAX_HISTORY_LIMIT: u32 = 200;
const MAX_CONTENT_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub content: String,
    #[serde(default)]
    pub receiver_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MessageOut {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageOut {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<MessageOut>>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }

    let messages = state.messages.list_recent(limit).await?;
    Ok(Json(messages.into_iter().map(MessageOut::from).collect()))
}

pub async fn send(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(payload): Json<SendRequest>,
) -> Result<(StatusCode, Json<MessageOut>), ApiError> {
    if payload.content.is_empty() || payload.content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "content must be 1-{MAX_CONTENT_CHARS} characters"
        )));
    }

    let message = state
        .messages
        .send(&NewMessage {
            sender_id: user.id,
            receiver_id: payload.receiver_id,
            content: payload.content,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}
