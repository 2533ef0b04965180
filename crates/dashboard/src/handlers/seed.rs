//! One-shot database seeding.

use std::sync::Arc;

use axum::{Extension, response::Json};
use seed_data::db::Seeder;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;

pub const SEED_SUCCESS_MESSAGE: &str = "Database seeded successfully";

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
}

/// Creates the dashboard tables if needed and loads the placeholder data.
///
/// The whole run is one transaction: a 200 means every table was seeded, any
/// failure rolls everything back and comes out as a 500 `{"error": ...}`.
/// A seeder without data is a deployment mistake and is refused up front.
pub async fn seed_database(
    Extension(seeder): Extension<Arc<Seeder>>,
) -> Result<Json<SeedResponse>, AppError> {
    if seeder.dataset().is_empty() {
        return Err(AppError::Config("no seed data is configured".to_string()));
    }

    let report = seeder.run().await?;
    info!("Seed request inserted {} rows", report.total());

    Ok(Json(SeedResponse {
        message: SEED_SUCCESS_MESSAGE.to_string(),
    }))
}
