//! Property-based integration tests for the point cache.
//!
//! These tests check the gap-filling contract over random store contents and
//! random requests, using the `proptest` crate for case generation.

use async_trait::async_trait;
use chrono::Duration;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use fundamentals_core::series::{
    InMemoryPointStore, ObservationDate, PointCache, PointFetcher, PointStore, PointValue, Symbol,
};
use fundamentals_core::Result;

// =============================================================================
// Helpers
// =============================================================================

fn day(offset: u32) -> ObservationDate {
    ObservationDate::from_ymd(2012, 12, 1).unwrap() + Duration::days(offset as i64)
}

/// Has data on even offsets only.
#[derive(Default)]
struct EvenDaysFetcher {
    calls: Mutex<Vec<BTreeSet<ObservationDate>>>,
}

#[async_trait]
impl PointFetcher for EvenDaysFetcher {
    async fn fetch(
        &self,
        _symbol: &Symbol,
        dates: &BTreeSet<ObservationDate>,
    ) -> Result<Vec<(ObservationDate, f64)>> {
        self.calls.lock().unwrap().push(dates.clone());
        let origin = day(0);
        Ok(dates
            .iter()
            .filter_map(|d| {
                let offset = (d.instant() - origin.instant()).num_days();
                (offset % 2 == 0).then_some((*d, offset as f64))
            })
            .collect())
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn same(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// The fetcher sees exactly the requested dates that are not stored.
    #[test]
    fn prop_fetches_only_gaps(
        stored in prop::collection::btree_set(0u32..60, 0..30),
        requested in prop::collection::vec(0u32..60, 0..40),
    ) {
        runtime().block_on(async {
            let store = Arc::new(InMemoryPointStore::new());
            let fetcher = Arc::new(EvenDaysFetcher::default());
            let symbol = Symbol::new("GOOG");

            let seeded: Vec<(ObservationDate, PointValue)> = stored
                .iter()
                .map(|o| (day(*o), PointValue::Value(-1.0)))
                .collect();
            store.set_batch(&symbol, &seeded).await.unwrap();

            let cache = PointCache::new(store.clone(), fetcher.clone());
            let series = cache
                .get(&symbol, requested.iter().map(|o| day(*o)))
                .await
                .unwrap();

            let wanted: BTreeSet<u32> = requested.iter().copied().collect();
            let gaps: BTreeSet<ObservationDate> =
                wanted.difference(&stored).map(|o| day(*o)).collect();

            let calls = fetcher.calls.lock().unwrap();
            if gaps.is_empty() {
                prop_assert!(calls.is_empty());
            } else {
                prop_assert_eq!(calls.len(), 1);
                prop_assert_eq!(&calls[0], &gaps);
            }

            // Exactly the requested dates, ascending, stored values untouched.
            let dates: Vec<ObservationDate> = series.dates().collect();
            let expected: Vec<ObservationDate> = wanted.iter().map(|o| day(*o)).collect();
            prop_assert_eq!(dates, expected);
            for o in wanted.intersection(&stored) {
                prop_assert_eq!(series.get(day(*o)), Some(-1.0));
            }
            Ok(())
        })?;
    }

    /// A second identical request never reaches the fetcher and returns the
    /// same values, NaN included.
    #[test]
    fn prop_second_request_is_served_from_store(
        requested in prop::collection::vec(0u32..60, 1..40),
    ) {
        runtime().block_on(async {
            let store = Arc::new(InMemoryPointStore::new());
            let fetcher = Arc::new(EvenDaysFetcher::default());
            let cache = PointCache::new(store.clone(), fetcher.clone());
            let symbol = Symbol::new("AAPL");
            let dates: Vec<ObservationDate> = requested.iter().map(|o| day(*o)).collect();

            let first = cache.get(&symbol, dates.clone()).await.unwrap();
            let calls_after_first = fetcher.calls.lock().unwrap().len();
            let second = cache.get(&symbol, dates).await.unwrap();

            prop_assert_eq!(calls_after_first, 1);
            prop_assert_eq!(fetcher.calls.lock().unwrap().len(), 1);
            prop_assert_eq!(first.len(), second.len());
            for ((d1, v1), (d2, v2)) in first.iter().zip(second.iter()) {
                prop_assert_eq!(d1, d2);
                prop_assert!(same(*v1, *v2));
            }

            // Odd offsets had no data and are stored as NoData.
            let odd: Vec<ObservationDate> = requested
                .iter()
                .filter(|o| *o % 2 == 1)
                .map(|o| day(*o))
                .collect();
            let found = store.get(&symbol, &odd).unwrap();
            prop_assert!(found.values().all(|v| v.is_no_data()));
            prop_assert_eq!(found.len(), odd.iter().collect::<BTreeSet<_>>().len());
            Ok(())
        })?;
    }
}
