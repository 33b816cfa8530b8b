//! Concrete fetchers.
//!
//! - [`ProviderPointFetcher`] pulls daily bars from a market data provider
//! - [`ReportScheduleFetcher`] turns dated reported figures into intervals
//! - [`CsvReportSource`] reads reported figures from a CSV file

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use fundamentals_market_data::{DailyBar, PriceField, PriceHistoryProvider, YahooProvider};

use super::fetcher::{IntervalFetcher, PointFetcher};
use super::types::{Bound, Interval, ObservationDate, Symbol};
use crate::errors::{Error, Result};

// =============================================================================
// Provider-backed point fetcher
// =============================================================================

/// Point fetcher for one bar field of a [`PriceHistoryProvider`].
pub struct ProviderPointFetcher<P> {
    provider: P,
    field: PriceField,
}

/// Daily adjusted closes (or another field) from Yahoo Finance.
pub type YahooPointFetcher = ProviderPointFetcher<YahooProvider>;

impl<P: PriceHistoryProvider> ProviderPointFetcher<P> {
    pub fn new(provider: P, field: PriceField) -> Self {
        Self { provider, field }
    }
}

impl YahooPointFetcher {
    pub fn yahoo(field: PriceField) -> Result<Self> {
        Ok(Self::new(YahooProvider::new()?, field))
    }
}

/// Matches bars to requested dates by UTC calendar day.
///
/// Bars on days nobody asked for are dropped, as are NaN values. If two bars
/// share a day the later one wins.
pub fn align_bars_to_dates(
    bars: &[DailyBar],
    dates: &BTreeSet<ObservationDate>,
    field: PriceField,
) -> Vec<(ObservationDate, f64)> {
    let by_day: HashMap<_, f64> = bars.iter().map(|bar| (bar.day(), bar.field(field))).collect();
    dates
        .iter()
        .filter_map(|date| {
            by_day
                .get(&date.day())
                .filter(|value| !value.is_nan())
                .map(|value| (*date, *value))
        })
        .collect()
}

#[async_trait]
impl<P: PriceHistoryProvider> PointFetcher for ProviderPointFetcher<P> {
    async fn fetch(
        &self,
        symbol: &Symbol,
        dates: &BTreeSet<ObservationDate>,
    ) -> Result<Vec<(ObservationDate, f64)>> {
        let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
            return Ok(Vec::new());
        };
        let start = ObservationDate::from_naive_date(first.day()).instant();
        let end = last.start_of_next_day().instant();

        let bars = match self.provider.get_daily_bars(symbol.as_str(), start, end).await {
            Ok(bars) => bars,
            Err(e) if e.is_absence() => {
                debug!(
                    "{} has no {} data for {} between {} and {}: {}",
                    self.provider.id(),
                    self.field,
                    symbol,
                    first,
                    last,
                    e
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(align_bars_to_dates(&bars, dates, self.field))
    }
}

// =============================================================================
// Report schedule interval fetcher
// =============================================================================

/// A figure reported on a date, valid until the next report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub date: ObservationDate,
    pub value: f64,
}

impl Report {
    pub fn new(date: ObservationDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Source of dated reports for a symbol, in any order.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn reports(&self, symbol: &Symbol) -> Result<Vec<Report>>;
}

/// Interval fetcher built on a schedule of reports.
///
/// Each report is valid from its own date until the next report. A date
/// before the first report gets an interval with an unbounded start and a
/// NaN value, ending at the first report.
pub struct ReportScheduleFetcher<S> {
    source: S,
}

impl<S: ReportSource> ReportScheduleFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

/// Interval containing `date` given a schedule sorted by date.
pub fn interval_for_date(schedule: &[Report], date: ObservationDate) -> Interval {
    let idx = schedule.partition_point(|report| report.date <= date);
    let next = Bound::from_option(schedule.get(idx).map(|report| report.date));
    match idx.checked_sub(1).and_then(|i| schedule.get(i)) {
        Some(current) => Interval::new(current.date, next, current.value),
        None => Interval::new(Bound::Unbounded, next, f64::NAN),
    }
}

#[async_trait]
impl<S: ReportSource> IntervalFetcher for ReportScheduleFetcher<S> {
    async fn fetch(&self, symbol: &Symbol, date: ObservationDate) -> Result<Interval> {
        let mut schedule = self.source.reports(symbol).await?;
        schedule.sort_by_key(|report| report.date);
        debug!("{} reports on file for {}", schedule.len(), symbol);
        Ok(interval_for_date(&schedule, date))
    }
}

// =============================================================================
// CSV report source
// =============================================================================

#[derive(Debug, Deserialize)]
struct ReportRow {
    symbol: String,
    date: String,
    value: f64,
}

/// Reports loaded from CSV with a `symbol,date,value` header.
///
/// Dates may be RFC 3339 timestamps or plain `YYYY-MM-DD` days.
#[derive(Debug, Clone, Default)]
pub struct CsvReportSource {
    reports: HashMap<Symbol, Vec<Report>>,
}

impl CsvReportSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            Error::ConfigIO(format!("Cannot open {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut reports: HashMap<Symbol, Vec<Report>> = HashMap::new();

        for (line, row) in rdr.deserialize::<ReportRow>().enumerate() {
            let row = row.map_err(|e| Error::Validation(format!("Report row {}: {}", line + 1, e)))?;
            let date = ObservationDate::parse_lenient(&row.date).ok_or_else(|| {
                Error::Validation(format!("Report row {}: invalid date '{}'", line + 1, row.date))
            })?;
            reports
                .entry(Symbol::new(row.symbol))
                .or_default()
                .push(Report::new(date, row.value));
        }

        Ok(Self { reports })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.reports.keys()
    }
}

#[async_trait]
impl ReportSource for CsvReportSource {
    async fn reports(&self, symbol: &Symbol) -> Result<Vec<Report>> {
        Ok(self.reports.get(symbol).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use fundamentals_market_data::MarketDataError;
    use std::sync::{Arc, Mutex};

    fn date(y: i32, m: u32, d: u32) -> ObservationDate {
        ObservationDate::from_ymd(y, m, d).unwrap()
    }

    fn bar(y: i32, m: u32, d: u32, adjclose: f64) -> DailyBar {
        DailyBar {
            timestamp: Utc.with_ymd_and_hms(y, m, d, 14, 30, 0).unwrap(),
            open: adjclose,
            high: adjclose,
            low: adjclose,
            close: adjclose,
            adjclose,
            volume: 1_000,
        }
    }

    struct MockProvider {
        result: Mutex<Option<std::result::Result<Vec<DailyBar>, MarketDataError>>>,
        calls: Arc<Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>)>>>,
    }

    impl MockProvider {
        fn returning(result: std::result::Result<Vec<DailyBar>, MarketDataError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl PriceHistoryProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn get_daily_bars(
            &self,
            symbol: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> std::result::Result<Vec<DailyBar>, MarketDataError> {
            self.calls.lock().unwrap().push((symbol.to_string(), start, end));
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(MarketDataError::NoDataForRange))
        }
    }

    #[test]
    fn test_align_bars_matches_by_day() {
        let bars = vec![bar(2012, 12, 3, 10.0), bar(2012, 12, 4, f64::NAN), bar(2012, 12, 5, 12.0)];
        let dates: BTreeSet<_> = [date(2012, 12, 1), date(2012, 12, 3), date(2012, 12, 4)]
            .into_iter()
            .collect();
        let aligned = align_bars_to_dates(&bars, &dates, PriceField::AdjClose);
        assert_eq!(aligned, vec![(date(2012, 12, 3), 10.0)]);
    }

    #[tokio::test]
    async fn test_provider_fetcher_requests_covering_range() {
        let provider = Arc::new(MockProvider::returning(Ok(vec![bar(2012, 12, 3, 10.0)])));
        let fetcher = ProviderPointFetcher::new(provider.clone(), PriceField::AdjClose);
        let dates: BTreeSet<_> = [date(2012, 12, 3), date(2012, 12, 7)].into_iter().collect();

        let result = fetcher.fetch(&Symbol::new("GOOG"), &dates).await.unwrap();
        assert_eq!(result, vec![(date(2012, 12, 3), 10.0)]);

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "GOOG");
        assert_eq!(calls[0].1, date(2012, 12, 3).instant());
        assert_eq!(calls[0].2, date(2012, 12, 8).instant());
    }

    #[tokio::test]
    async fn test_provider_absence_is_empty_result() {
        let provider = MockProvider::returning(Err(MarketDataError::SymbolNotFound("NOPE".into())));
        let fetcher = ProviderPointFetcher::new(provider, PriceField::AdjClose);
        let dates: BTreeSet<_> = [date(2012, 12, 3)].into_iter().collect();
        let result = fetcher.fetch(&Symbol::new("NOPE"), &dates).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = MockProvider::returning(Err(MarketDataError::ProviderError {
            provider: "MOCK".into(),
            message: "bad gateway".into(),
        }));
        let fetcher = ProviderPointFetcher::new(provider, PriceField::AdjClose);
        let dates: BTreeSet<_> = [date(2012, 12, 3)].into_iter().collect();
        let result = fetcher.fetch(&Symbol::new("GOOG"), &dates).await;
        assert!(matches!(result, Err(Error::MarketData(MarketDataError::ProviderError { .. }))));
    }

    #[test]
    fn test_interval_for_date() {
        let schedule = vec![
            Report::new(date(2012, 7, 19), 10.12),
            Report::new(date(2012, 10, 18), 9.03),
            Report::new(date(2013, 1, 22), 11.2),
        ];

        let before = interval_for_date(&schedule, date(2012, 1, 1));
        assert_eq!(before.start, Bound::Unbounded);
        assert_eq!(before.end, Bound::At(date(2012, 7, 19)));
        assert!(before.value.is_nan());

        let middle = interval_for_date(&schedule, date(2012, 12, 14));
        assert_eq!(middle, Interval::new(date(2012, 10, 18), date(2013, 1, 22), 9.03));

        let on_report_day = interval_for_date(&schedule, date(2012, 10, 18));
        assert_eq!(on_report_day.value, 9.03);

        let latest = interval_for_date(&schedule, date(2013, 6, 1));
        assert_eq!(latest, Interval::new(date(2013, 1, 22), Bound::Unbounded, 11.2));

        let nothing = interval_for_date(&[], date(2013, 6, 1));
        assert!(nothing.start.is_unbounded() && nothing.end.is_unbounded());
        assert!(nothing.value.is_nan());
    }

    #[tokio::test]
    async fn test_csv_report_source_feeds_schedule_fetcher() {
        let csv = "symbol,date,value\n\
                   GOOG,2013-01-22,11.2\n\
                   GOOG,2012-10-18,9.03\n\
                   AAPL,2012-10-25T20:30:00Z,8.67\n";
        let source = CsvReportSource::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(source.reports(&Symbol::new("GOOG")).await.unwrap().len(), 2);

        let fetcher = ReportScheduleFetcher::new(source);
        let interval = fetcher
            .fetch(&Symbol::new("GOOG"), date(2012, 12, 14))
            .await
            .unwrap();
        assert_eq!(interval, Interval::new(date(2012, 10, 18), date(2013, 1, 22), 9.03));
    }

    #[test]
    fn test_csv_report_source_rejects_bad_dates() {
        let csv = "symbol,date,value\nGOOG,yesterday,1.0\n";
        let result = CsvReportSource::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
