//! Fundamentals Core - caching engine for financial time series.
//!
//! This crate contains the cache logic: working out which values are missing
//! from a store, fetching only those, persisting the results (including
//! "no data" markers) and merging them with what was already cached.
//! It is database-agnostic and defines the store traits that the
//! `storage-sqlite` crate implements.

pub mod config;
pub mod constants;
pub mod errors;
pub mod series;
pub mod utils;

pub use config::CacheConfig;
pub use series::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
