use axum::extract::{Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use emoji_shared::types::AuthUser;
use emoji_shared::AppError;

use crate::middleware::access_gate::is_api;
use crate::views::page;
use crate::AppState;

// --- GET / ---

pub async fn index(user: AuthUser, State(state): State<Arc<AppState>>) -> Html<String> {
    let emojis = match state.emojis.list_newest_first().await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(user_id = %user.id, error = %e, "gallery load failed, rendering placeholders");
            Vec::new()
        }
    };
    Html(page::index_page(&emojis))
}

// --- GET /sign-in ---

#[derive(Debug, Deserialize)]
pub struct SignInQuery {
    pub redirect_url: Option<String>,
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SignInQuery>,
) -> Html<String> {
    let redirect_url = query.redirect_url.as_deref().unwrap_or("/");
    Html(page::sign_in_page(
        state.config.identity_sign_in_portal_url.as_deref(),
        redirect_url,
    ))
}

pub async fn not_found(uri: Uri) -> Response {
    if is_api(uri.path()) {
        return AppError::not_found("not found").into_response();
    }
    (StatusCode::NOT_FOUND, Html(page::not_found_page())).into_response()
}
