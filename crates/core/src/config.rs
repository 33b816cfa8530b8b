//! Runtime configuration for the cache and its SQLite backend.

use crate::constants::*;
use crate::errors::{Error, Result};
use crate::series::Metric;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub db_path: String,
    pub price_metric: Metric,
    pub eps_metric: Metric,
    pub db_pool_size: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            price_metric: Metric::new(DEFAULT_PRICE_METRIC),
            eps_metric: Metric::new(DEFAULT_EPS_METRIC),
            db_pool_size: DEFAULT_DB_POOL_SIZE,
        }
    }
}

impl CacheConfig {
    /// Loads configuration from the process environment, reading a `.env`
    /// file first if one is present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Unset keys fall
    /// back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let db_path = lookup(ENV_DB_PATH)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.db_path);
        let price_metric = lookup(ENV_PRICE_METRIC)
            .filter(|s| !s.trim().is_empty())
            .map(Metric::new)
            .unwrap_or(defaults.price_metric);
        let eps_metric = lookup(ENV_EPS_METRIC)
            .filter(|s| !s.trim().is_empty())
            .map(Metric::new)
            .unwrap_or(defaults.eps_metric);

        let db_pool_size = match lookup(ENV_DB_POOL_SIZE) {
            Some(raw) => {
                let size: u32 = raw.trim().parse().map_err(|_| {
                    Error::InvalidConfigValue(format!("{} must be a number, got '{}'", ENV_DB_POOL_SIZE, raw))
                })?;
                // The writer actor holds one connection for its lifetime.
                if size < 2 {
                    return Err(Error::InvalidConfigValue(format!(
                        "{} must be at least 2, got {}",
                        ENV_DB_POOL_SIZE, size
                    )));
                }
                size
            }
            None => defaults.db_pool_size,
        };

        Ok(Self {
            db_path,
            price_metric,
            eps_metric,
            db_pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CacheConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, CacheConfig::default());
        assert_eq!(config.price_metric.as_str(), "Adj Close");
        assert_eq!(config.eps_metric.as_str(), "EPS");
    }

    #[test]
    fn test_overrides() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/prices.db"),
            (ENV_PRICE_METRIC, "Close"),
            (ENV_DB_POOL_SIZE, "4"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/tmp/prices.db");
        assert_eq!(config.price_metric.as_str(), "Close");
        assert_eq!(config.db_pool_size, 4);
    }

    #[test]
    fn test_invalid_pool_size() {
        let result = CacheConfig::from_lookup(lookup_from(&[(ENV_DB_POOL_SIZE, "many")]));
        assert!(matches!(result, Err(Error::InvalidConfigValue(_))));

        let result = CacheConfig::from_lookup(lookup_from(&[(ENV_DB_POOL_SIZE, "1")]));
        assert!(matches!(result, Err(Error::InvalidConfigValue(_))));
    }
}
