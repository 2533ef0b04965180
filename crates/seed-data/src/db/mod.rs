//! Database integration for seeding the dashboard.
//!
//! The [`Seeder`] creates the dashboard tables when they are missing and loads
//! a [`SeedDataset`](crate::fixture::SeedDataset) into them in one transaction.

pub mod schema;
mod seeder;

pub use seeder::{SeedReport, Seeder};
