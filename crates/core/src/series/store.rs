//! Series storage traits.
//!
//! These traits abstract the persistence layer for cached values so that the
//! caches can run against SQLite, memory, or any other backend.
//!
//! # Strong Types
//!
//! - `Symbol` - Partition key
//! - `ObservationDate` - UTC-normalized key within a symbol
//! - `PointValue` - Stored daily value or the NoData marker
//! - `Interval` - Stored interval value with optional bounds

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::types::{Interval, ObservationDate, PointValue, Symbol};
use crate::errors::Result;

// =============================================================================
// Point Store
// =============================================================================

/// Storage interface for point (daily) values of a single metric.
///
/// # Design Notes
///
/// - Reads are sync; implementations serve them from a connection pool
/// - Writes are async; implementations may funnel them through a writer task
/// - Dates that were never stored are absent from the result map. A stored
///   `PointValue::NoData` is present.
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Returns the stored values for whichever of `dates` are present.
    fn get(
        &self,
        symbol: &Symbol,
        dates: &[ObservationDate],
    ) -> Result<HashMap<ObservationDate, PointValue>>;

    /// Stores one value. Last write wins.
    async fn set(&self, symbol: &Symbol, date: ObservationDate, value: PointValue) -> Result<()>;

    /// Stores several values for one symbol. Returns the number written.
    async fn set_batch(
        &self,
        symbol: &Symbol,
        entries: &[(ObservationDate, PointValue)],
    ) -> Result<usize> {
        for (date, value) in entries {
            self.set(symbol, *date, *value).await?;
        }
        Ok(entries.len())
    }
}

// =============================================================================
// Interval Store
// =============================================================================

/// Storage interface for interval values of a single metric.
#[async_trait]
pub trait IntervalStore: Send + Sync {
    /// Finds a stored interval containing `date`.
    ///
    /// When several match, the one with the latest start wins (an unbounded
    /// start is the earliest). Among equal starts, the most recently
    /// inserted wins.
    fn find_covering(&self, symbol: &Symbol, date: ObservationDate) -> Result<Option<Interval>>;

    /// Stores an interval as given. An existing interval with the same
    /// bounds is replaced, whatever its value (NaN included); others are
    /// left untouched.
    async fn insert(&self, symbol: &Symbol, interval: &Interval) -> Result<()>;
}

// =============================================================================
// Shared handles
// =============================================================================

#[async_trait]
impl<T: PointStore + ?Sized> PointStore for Arc<T> {
    fn get(
        &self,
        symbol: &Symbol,
        dates: &[ObservationDate],
    ) -> Result<HashMap<ObservationDate, PointValue>> {
        (**self).get(symbol, dates)
    }

    async fn set(&self, symbol: &Symbol, date: ObservationDate, value: PointValue) -> Result<()> {
        (**self).set(symbol, date, value).await
    }

    async fn set_batch(
        &self,
        symbol: &Symbol,
        entries: &[(ObservationDate, PointValue)],
    ) -> Result<usize> {
        (**self).set_batch(symbol, entries).await
    }
}

#[async_trait]
impl<T: IntervalStore + ?Sized> IntervalStore for Arc<T> {
    fn find_covering(&self, symbol: &Symbol, date: ObservationDate) -> Result<Option<Interval>> {
        (**self).find_covering(symbol, date)
    }

    async fn insert(&self, symbol: &Symbol, interval: &Interval) -> Result<()> {
        (**self).insert(symbol, interval).await
    }
}
