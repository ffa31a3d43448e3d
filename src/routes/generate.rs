// src/routes/generate.rs
use axum::{Json, extract::State, extract::rejection::JsonRejection};

use crate::{
    error::AppError,
    message::{GenerateRequest, GenerateResponse},
    state::SharedState,
};

pub async fn generate_handler(
    State(state): State<SharedState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    // Malformed or missing bodies never reach the backend.
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    if payload.messages.is_empty() {
        return Err(AppError::BadRequest(
            "messages must not be empty".to_string(),
        ));
    }

    let content = state
        .completions
        .generate(&payload.messages, payload.system_prompt.as_deref())
        .await?;

    Ok(Json(GenerateResponse { content }))
}
