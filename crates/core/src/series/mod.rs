//! Series caching module.
//!
//! - [`types`] - Strong types: symbols, metrics, dates, point and interval values
//! - [`store`] - Storage traits implemented by backends
//! - [`fetcher`] - Upstream fetcher traits called on a cache miss
//! - [`point_cache`] - Gap-filling cache for daily values
//! - [`table`] - Multi-symbol price tables on top of the point cache
//! - [`interval_cache`] - Cache for values valid over date ranges
//! - [`fetchers`] - Provider-backed and report-schedule fetchers
//! - [`memory`] - In-memory stores
//!
//! # Architecture
//!
//! ```text
//! PointCache ──────→ PointFetcher ──→ market-data crate (providers)
//!     ↓
//! PointStore (DB / memory)
//!
//! IntervalCache ───→ IntervalFetcher ──→ ReportSource
//!     ↓
//! IntervalStore (DB / memory)
//! ```
//!
//! The caches hold no state of their own; everything they learn goes to the
//! store, including "fetched, nothing there" for points.

pub mod fetcher;
pub mod fetchers;
pub mod interval_cache;
pub mod memory;
pub mod point_cache;
pub mod store;
pub mod table;
pub mod types;


pub use fetcher::{IntervalFetcher, PointFetcher};
pub use fetchers::{
    CsvReportSource, ProviderPointFetcher, Report, ReportScheduleFetcher, ReportSource,
    YahooPointFetcher,
};
pub use interval_cache::IntervalCache;
pub use memory::{InMemoryIntervalStore, InMemoryPointStore};
pub use point_cache::{PointCache, PointSeries};
pub use store::{IntervalStore, PointStore};
pub use table::{PriceTable, TableRequest};
pub use types::{Bound, Interval, Metric, ObservationDate, PointValue, Symbol};
