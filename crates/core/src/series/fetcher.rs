//! Data fetcher traits.
//!
//! A fetcher is the upstream source the caches call on a miss. The caches
//! never retry; a fetcher error is returned to the caller as-is.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::types::{Interval, ObservationDate, Symbol};
use crate::errors::Result;

/// Upstream source of daily values.
#[async_trait]
pub trait PointFetcher: Send + Sync {
    /// Fetches values for some subset of `dates`.
    ///
    /// Dates left out of the result are treated as "no data". NaN values are
    /// treated the same way. Entries for dates that were not asked for are
    /// ignored by the cache.
    async fn fetch(
        &self,
        symbol: &Symbol,
        dates: &BTreeSet<ObservationDate>,
    ) -> Result<Vec<(ObservationDate, f64)>>;
}

/// Upstream source of interval values.
#[async_trait]
pub trait IntervalFetcher: Send + Sync {
    /// Returns the interval believed to contain `date`.
    async fn fetch(&self, symbol: &Symbol, date: ObservationDate) -> Result<Interval>;
}

#[async_trait]
impl<T: PointFetcher + ?Sized> PointFetcher for Arc<T> {
    async fn fetch(
        &self,
        symbol: &Symbol,
        dates: &BTreeSet<ObservationDate>,
    ) -> Result<Vec<(ObservationDate, f64)>> {
        (**self).fetch(symbol, dates).await
    }
}

#[async_trait]
impl<T: IntervalFetcher + ?Sized> IntervalFetcher for Arc<T> {
    async fn fetch(&self, symbol: &Symbol, date: ObservationDate) -> Result<Interval> {
        (**self).fetch(symbol, date).await
    }
}
