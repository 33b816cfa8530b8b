//! SQLite stores for the point and interval caches.

mod interval_repository;
mod model;
mod point_repository;

pub use interval_repository::SqliteIntervalStore;
pub use model::{interval_id, IntervalValueDB, PointValueDB};
pub use point_repository::SqlitePointStore;
