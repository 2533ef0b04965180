use std::time::Duration;

use thiserror::Error;

/// Message used when a failure carries nothing worth showing to a caller.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    #[error("Invalid seed fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("Seeding did not finish within {0:?}")]
    Timeout(Duration),

    #[error("An unexpected error occurred")]
    Unexpected,
}

impl SeedError {
    /// True for failures with no recognizable cause, such as a panicked task.
    pub fn is_opaque(&self) -> bool {
        matches!(self, SeedError::Unexpected)
    }
}

impl From<tokio::task::JoinError> for SeedError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Seed task failed: {err}");
        SeedError::Unexpected
    }
}
