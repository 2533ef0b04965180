use axum::http::StatusCode;

/// Health check endpoint. Does not touch the database.
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
