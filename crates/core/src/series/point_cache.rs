//! Point cache: gap-filling cache for daily values.

use log::{debug, info};
use std::collections::{BTreeSet, HashMap};

use super::fetcher::PointFetcher;
use super::store::PointStore;
use super::types::{ObservationDate, PointValue, Symbol};
use crate::errors::Result;

/// Values for a set of requested dates, ascending by date.
///
/// NoData is reported as NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSeries {
    points: Vec<(ObservationDate, f64)>,
}

impl PointSeries {
    pub(crate) fn from_sorted(points: Vec<(ObservationDate, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (ObservationDate, f64)> {
        self.points.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = ObservationDate> + '_ {
        self.points.iter().map(|(date, _)| *date)
    }

    /// Value for `date`, or None if the date was not part of the request.
    pub fn get(&self, date: ObservationDate) -> Option<f64> {
        self.points
            .binary_search_by(|(d, _)| d.cmp(&date))
            .ok()
            .map(|idx| self.points[idx].1)
    }

    pub fn into_vec(self) -> Vec<(ObservationDate, f64)> {
        self.points
    }
}

impl IntoIterator for PointSeries {
    type Item = (ObservationDate, f64);
    type IntoIter = std::vec::IntoIter<(ObservationDate, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a PointSeries {
    type Item = &'a (ObservationDate, f64);
    type IntoIter = std::slice::Iter<'a, (ObservationDate, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Cache for daily values of one metric.
///
/// A lookup reads the store, fetches only the dates the store has never seen,
/// and persists every fetched date. Dates the fetcher had nothing for are
/// stored as `PointValue::NoData` so they are not fetched again.
pub struct PointCache<S, F> {
    store: S,
    fetcher: F,
}

impl<S, F> PointCache<S, F>
where
    S: PointStore,
    F: PointFetcher,
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

    /// Resolves `dates` for `symbol`. Duplicate dates are collapsed.
    ///
    /// Makes at most one fetcher call. If it fails, nothing is written and
    /// the error is returned.
    ///
    /// Not streaming: all reads, the fetch and the write finish before the
    /// owned, date-sorted [`PointSeries`] is returned.
    pub async fn get<I>(&self, symbol: &Symbol, dates: I) -> Result<PointSeries>
    where
        I: IntoIterator<Item = ObservationDate>,
    {
        let requested: BTreeSet<ObservationDate> = dates.into_iter().collect();
        if requested.is_empty() {
            return Ok(PointSeries::default());
        }

        let keys: Vec<ObservationDate> = requested.iter().copied().collect();
        let mut found = self.store.get(symbol, &keys)?;
        found.retain(|date, _| requested.contains(date));

        let missing: BTreeSet<ObservationDate> = requested
            .iter()
            .filter(|date| !found.contains_key(date))
            .copied()
            .collect();

        debug!(
            "Point cache {}: {} cached, {} missing of {} requested",
            symbol,
            found.len(),
            missing.len(),
            requested.len()
        );

        if !missing.is_empty() {
            debug!("Fetching {} dates for {}", missing.len(), symbol);
            let fetched = self.fetcher.fetch(symbol, &missing).await?;

            let mut filled: HashMap<ObservationDate, PointValue> = fetched
                .into_iter()
                .filter(|(date, _)| missing.contains(date))
                .map(|(date, value)| (date, PointValue::from_f64(value)))
                .collect();

            let entries: Vec<(ObservationDate, PointValue)> = missing
                .iter()
                .map(|date| (*date, filled.remove(date).unwrap_or(PointValue::NoData)))
                .collect();

            let no_data = entries.iter().filter(|(_, v)| v.is_no_data()).count();
            self.store.set_batch(symbol, &entries).await?;
            if no_data > 0 {
                info!(
                    "Cached {} NoData markers for {} ({} values)",
                    no_data,
                    symbol,
                    entries.len() - no_data
                );
            }

            found.extend(entries);
        }

        let points = requested
            .into_iter()
            .map(|date| {
                let value = found.get(&date).map(PointValue::to_f64).unwrap_or(f64::NAN);
                (date, value)
            })
            .collect();

        Ok(PointSeries::from_sorted(points))
    }
}
