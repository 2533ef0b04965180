use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seed_data::{SeedError, UNEXPECTED_ERROR_MESSAGE};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// The message shown to the caller. Opaque failures never leak details.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Seed(e) if e.is_opaque() => UNEXPECTED_ERROR_MESSAGE.to_string(),
            AppError::Seed(e) => e.to_string(),
            AppError::Config(_) => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {self}");

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
