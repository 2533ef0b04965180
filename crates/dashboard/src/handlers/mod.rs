//! HTTP request handlers for the dashboard API.

pub mod health;
pub mod seed;

pub use health::health_check;
pub use seed::{SEED_SUCCESS_MESSAGE, SeedResponse, seed_database};
