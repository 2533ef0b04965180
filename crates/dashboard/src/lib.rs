pub mod config;
pub mod errors;
pub mod handlers;
pub mod request_id;

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use seed_data::{db::Seeder, fixture::SeedDataset};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::{
    config::AppConfig,
    handlers::{health_check, seed_database},
    request_id::request_id_middleware,
};

pub fn create_router(seeder: Seeder) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/seed", get(seed_database))
        .layer(Extension(Arc::new(seeder)))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
}

/// Builds a pool that connects on first use, so the server starts even while
/// the database is down and each seed request acquires its own session.
pub fn lazy_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy(&config.database_url)?;
    Ok(pool)
}

pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let pool = lazy_pool(&config)?;
    let seeder = Seeder::new(pool)
        .with_dataset(SeedDataset::placeholder()?)
        .with_config(config.seed.clone());
    let app = create_router(seeder);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
