use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use emoji_shared::errors::{AppError, AppResult};
use emoji_shared::middleware::OptionalAuthUser;
use emoji_shared::types::{GenerateRequest, GenerateResponse};

use crate::services::generation::GenerationError;
use crate::AppState;

// --- POST /api/generate ---

pub async fn generate_emoji(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    // A missing session outranks a malformed body.
    let result = match (payload, user.as_ref()) {
        (Ok(Json(req)), user) => state.generation.generate(&req.prompt, user).await,
        (Err(_), None) => Err(GenerationError::Unauthorized),
        (Err(rejection), Some(_)) => Err(GenerationError::InvalidRequest(rejection.body_text())),
    };

    match result {
        Ok(url) => {
            metrics::counter!("emoji_generations_total", "outcome" => "success").increment(1);
            Ok(Json(GenerateResponse { output: vec![url] }))
        }
        Err(err) => {
            let outcome = match &err {
                GenerationError::Unauthorized => "unauthorized",
                _ => "failure",
            };
            metrics::counter!("emoji_generations_total", "outcome" => outcome).increment(1);
            Err(AppError::from(err))
        }
    }
}
