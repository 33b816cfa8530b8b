/// Metric stored by the daily price cache unless configured otherwise
pub const DEFAULT_PRICE_METRIC: &str = "Adj Close";

/// Metric stored by the interval cache unless configured otherwise
pub const DEFAULT_EPS_METRIC: &str = "EPS";

/// Default SQLite database location
pub const DEFAULT_DB_PATH: &str = "./db/fundamentals.db";

/// Default r2d2 pool size for the SQLite backend
pub const DEFAULT_DB_POOL_SIZE: u32 = 8;

/// Environment variable names read by [`crate::config::CacheConfig::from_env`]
pub const ENV_DB_PATH: &str = "FUNDAMENTALS_DB_PATH";
pub const ENV_PRICE_METRIC: &str = "FUNDAMENTALS_PRICE_METRIC";
pub const ENV_EPS_METRIC: &str = "FUNDAMENTALS_EPS_METRIC";
pub const ENV_DB_POOL_SIZE: &str = "FUNDAMENTALS_DB_POOL_SIZE";
