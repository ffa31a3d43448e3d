// src/error.rs
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// Every configured model tier failed; carries the primary tier's
    /// failure status and body for diagnosis.
    #[error("upstream API error: {status}")]
    Upstream { status: u16, body: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Internal(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Invalid request", msg),
            AppError::Upstream { status, body } => (
                StatusCode::BAD_GATEWAY,
                "Failed to generate content. Please try again.",
                format!("API error: {status} - {body}"),
            ),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate content. Please try again.",
                err.to_string(),
            ),
        };

        let body = Json(json!({ "error": error, "details": details }));
        (status, body).into_response()
    }
}
