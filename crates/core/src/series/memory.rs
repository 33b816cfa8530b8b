//! In-memory stores.
//!
//! Useful for ephemeral runs and as the default backend in tests. Nothing is
//! persisted beyond the lifetime of the value.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use super::store::{IntervalStore, PointStore};
use super::types::{Bound, Interval, ObservationDate, PointValue, Symbol};
use crate::errors::{DatabaseError, Result};

fn poisoned<E>(_: E) -> DatabaseError {
    DatabaseError::Internal("in-memory store lock poisoned".to_string())
}

// =============================================================================
// Points
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryPointStore {
    values: RwLock<HashMap<Symbol, HashMap<ObservationDate, PointValue>>>,
    writes: AtomicUsize,
}

impl InMemoryPointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of individual values written since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of entries stored for `symbol`.
    pub fn len(&self, symbol: &Symbol) -> usize {
        self.values
            .read()
            .map(|values| values.get(symbol).map(|m| m.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.values
            .read()
            .map(|values| values.values().all(|m| m.is_empty()))
            .unwrap_or(true)
    }
}

#[async_trait]
impl PointStore for InMemoryPointStore {
    fn get(
        &self,
        symbol: &Symbol,
        dates: &[ObservationDate],
    ) -> Result<HashMap<ObservationDate, PointValue>> {
        let values = self.values.read().map_err(poisoned)?;
        let Some(by_date) = values.get(symbol) else {
            return Ok(HashMap::new());
        };
        Ok(dates
            .iter()
            .filter_map(|date| by_date.get(date).map(|value| (*date, *value)))
            .collect())
    }

    async fn set(&self, symbol: &Symbol, date: ObservationDate, value: PointValue) -> Result<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.entry(symbol.clone()).or_default().insert(date, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_batch(
        &self,
        symbol: &Symbol,
        entries: &[(ObservationDate, PointValue)],
    ) -> Result<usize> {
        let mut values = self.values.write().map_err(poisoned)?;
        let by_date = values.entry(symbol.clone()).or_default();
        for (date, value) in entries {
            by_date.insert(*date, *value);
        }
        self.writes.fetch_add(entries.len(), Ordering::SeqCst);
        Ok(entries.len())
    }
}

// =============================================================================
// Intervals
// =============================================================================

#[derive(Debug, Default)]
pub struct InMemoryIntervalStore {
    intervals: RwLock<HashMap<Symbol, Vec<Interval>>>,
    writes: AtomicUsize,
}

impl InMemoryIntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// All intervals stored for `symbol`, in insertion order.
    pub fn intervals(&self, symbol: &Symbol) -> Vec<Interval> {
        self.intervals
            .read()
            .map(|intervals| intervals.get(symbol).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IntervalStore for InMemoryIntervalStore {
    fn find_covering(&self, symbol: &Symbol, date: ObservationDate) -> Result<Option<Interval>> {
        let intervals = self.intervals.read().map_err(poisoned)?;
        let Some(list) = intervals.get(symbol) else {
            return Ok(None);
        };
        // Latest start wins; Unbounded < At(_) because None < Some(_).
        // max_by_key keeps the last maximum, i.e. the latest insert.
        Ok(list
            .iter()
            .filter(|interval| interval.contains(date))
            .max_by_key(|interval| match interval.start {
                Bound::Unbounded => None,
                Bound::At(start) => Some(start),
            })
            .copied())
    }

    async fn insert(&self, symbol: &Symbol, interval: &Interval) -> Result<()> {
        let mut intervals = self.intervals.write().map_err(poisoned)?;
        let list = intervals.entry(symbol.clone()).or_default();
        list.retain(|existing| (existing.start, existing.end) != (interval.start, interval.end));
        list.push(*interval);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
