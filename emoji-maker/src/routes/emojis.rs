use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

use emoji_shared::errors::AppResult;
use emoji_shared::types::{AuthUser, EmojiListResponse, EmojiRecord};

use crate::services::gallery_service;
use crate::AppState;

// --- GET /api/emojis ---

pub async fn list_emojis(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<EmojiListResponse>> {
    let emojis = state.emojis.list_newest_first().await?;
    Ok(Json(EmojiListResponse { emojis }))
}

// --- POST /api/emojis/:id/like ---

pub async fn toggle_like(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<EmojiRecord>> {
    let record = gallery_service::toggle_like(state.emojis.as_ref(), id).await?;

    let action = if record.is_liked() { "like" } else { "unlike" };
    metrics::counter!("emoji_likes_total", "action" => action).increment(1);
    tracing::info!(emoji_id = id, user_id = %user.id, action, "like toggled");

    Ok(Json(record))
}
