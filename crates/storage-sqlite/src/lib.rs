//! SQLite storage implementation for the fundamentals cache.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the store traits defined in `fundamentals-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Point and interval store implementations
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The caches in `core` are database-agnostic and work with traits.
//!
//! ```text
//!   PointCache        IntervalCache      (core)
//!       │                  │
//!       └────────┬─────────┘
//!                │
//!                ▼
//!        storage-sqlite (this crate)
//!                │
//!                ▼
//!            SQLite DB
//! ```
//!
//! Reads go through the r2d2 pool. Writes go through a single writer task
//! ([`WriteHandle`]) so that SQLite never sees concurrent writers.

pub mod db;
pub mod errors;
pub mod schema;
pub mod series;
pub mod utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use series::{SqliteIntervalStore, SqlitePointStore};

// Re-export from fundamentals-core for convenience
pub use fundamentals_core::errors::{DatabaseError, Error, Result};
