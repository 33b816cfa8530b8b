//! Interval cache: values valid over date ranges (quarterly EPS and similar).

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use log::{debug, warn};

use super::fetcher::IntervalFetcher;
use super::store::IntervalStore;
use super::types::{Interval, ObservationDate, Symbol};
use crate::errors::Result;

/// Cache for interval values of one metric.
///
/// A date is answered by any stored interval that contains it. On a miss the
/// fetcher is asked for the containing interval, which is stored whole so
/// that later dates inside it are hits.
pub struct IntervalCache<S, F> {
    store: S,
    fetcher: F,
}

impl<S, F> IntervalCache<S, F>
where
    S: IntervalStore,
    F: IntervalFetcher,
{
    pub fn new(store: S, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Lazily resolves `dates` in input order, one item per date.
    ///
    /// Nothing is read or fetched until the stream is polled. Duplicates are
    /// resolved again (the second is a hit). An `Err` item means that date's
    /// fetch or store call failed; nothing was stored for it.
    pub fn get<'a, I>(
        &'a self,
        symbol: &'a Symbol,
        dates: I,
    ) -> impl Stream<Item = Result<(ObservationDate, f64)>> + 'a
    where
        I: IntoIterator<Item = ObservationDate>,
    {
        let dates: Vec<ObservationDate> = dates.into_iter().collect();
        stream::iter(dates).then(move |date| async move {
            self.resolve(symbol, date).await.map(|value| (date, value))
        })
    }

    /// Resolves every date, stopping at the first error.
    pub async fn get_all<I>(&self, symbol: &Symbol, dates: I) -> Result<Vec<(ObservationDate, f64)>>
    where
        I: IntoIterator<Item = ObservationDate>,
    {
        self.get(symbol, dates).try_collect().await
    }

    pub async fn get_one(&self, symbol: &Symbol, date: ObservationDate) -> Result<f64> {
        self.resolve(symbol, date).await
    }

    /// Stores an interval directly, bypassing the fetcher.
    pub async fn set_interval(&self, symbol: &Symbol, interval: &Interval) -> Result<()> {
        self.store.insert(symbol, interval).await
    }

    async fn resolve(&self, symbol: &Symbol, date: ObservationDate) -> Result<f64> {
        if let Some(interval) = self.store.find_covering(symbol, date)? {
            debug!("Interval cache hit for {} at {}: {}", symbol, date, interval);
            return Ok(interval.value);
        }

        debug!("Interval cache miss for {} at {}", symbol, date);
        let interval = self.fetcher.fetch(symbol, date).await?;
        if !interval.contains(date) {
            warn!(
                "Fetched interval {} for {} does not contain {}; storing it anyway",
                interval, symbol, date
            );
        }
        self.store.insert(symbol, &interval).await?;
        Ok(interval.value)
    }
}
