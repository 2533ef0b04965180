//! Configuration for seeding runs.

use std::{collections::HashMap, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::password::DEFAULT_HASH_COST;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Tuning knobs for a [`Seeder`](crate::db::Seeder) run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Maximum rows per multi-row INSERT statement.
    pub batch_size: usize,

    /// Maximum rows prepared concurrently within one table step.
    pub max_concurrency: usize,

    /// Argon2 iteration count used for seeded passwords.
    pub hash_cost: u32,

    /// Deadline for the whole run, transaction included.
    pub timeout: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_concurrency: 8,
            hash_cost: DEFAULT_HASH_COST,
            timeout: Duration::from_secs(30),
        }
    }
}

impl SeedConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(&std::env::vars().collect())
    }

    pub fn from_env_map(env_map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let batch_size = parse_or(env_map, "SEED_BATCH_SIZE", defaults.batch_size)?;
        let max_concurrency = parse_or(env_map, "SEED_MAX_CONCURRENCY", defaults.max_concurrency)?;
        let hash_cost = parse_or(env_map, "SEED_HASH_COST", defaults.hash_cost)?;
        let timeout_secs = parse_or(env_map, "SEED_TIMEOUT_SECS", defaults.timeout.as_secs())?;

        for (key, value) in [
            ("SEED_BATCH_SIZE", batch_size as u64),
            ("SEED_MAX_CONCURRENCY", max_concurrency as u64),
            ("SEED_HASH_COST", hash_cost as u64),
            ("SEED_TIMEOUT_SECS", timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue(
                    key.to_string(),
                    "must be greater than zero".to_string(),
                ));
            }
        }

        Ok(Self {
            batch_size,
            max_concurrency,
            hash_cost,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parses `key` from the map, falling back to `default` when it is absent.
pub fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), format!("cannot parse {raw:?}"))
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SeedConfig::from_env_map(&HashMap::new()).unwrap();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.hash_cost, DEFAULT_HASH_COST);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = SeedConfig::from_env_map(&env(&[
            ("SEED_BATCH_SIZE", "10"),
            ("SEED_MAX_CONCURRENCY", "2"),
            ("SEED_HASH_COST", "1"),
            ("SEED_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();

        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.hash_cost, 1);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_number() {
        let err = SeedConfig::from_env_map(&env(&[("SEED_BATCH_SIZE", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key, _) if key == "SEED_BATCH_SIZE"));
    }

    #[test]
    fn test_zero_rejected() {
        let err = SeedConfig::from_env_map(&env(&[("SEED_MAX_CONCURRENCY", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key, _) if key == "SEED_MAX_CONCURRENCY"));
    }
}
