//! Bootstrap data loader for the invoice dashboard.
//!
//! This crate owns the dashboard's four tables (`users`, `customers`,
//! `invoices`, `revenue`), the placeholder fixture that fills them, and the
//! transactional [`Seeder`](db::Seeder) that does the loading.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seed_data::prelude::*;
//!
//! let seeder = Seeder::new(pool)
//!     .with_dataset(SeedDataset::placeholder()?)
//!     .with_config(SeedConfig::from_env()?);
//! let report = seeder.run().await?;
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod fixture;
pub mod models;
pub mod password;

pub use error::{SeedError, UNEXPECTED_ERROR_MESSAGE};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{ConfigError, SeedConfig};
    pub use crate::db::{SeedReport, Seeder};
    pub use crate::error::SeedError;
    pub use crate::fixture::SeedDataset;
    pub use crate::models::{Customer, Invoice, InvoiceStatus, RevenueRecord, User};
}
