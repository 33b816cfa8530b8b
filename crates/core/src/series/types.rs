//! Strong types for the series caches.
//!
//! These types keep the cache's concepts apart:
//! - `Symbol` - Partition key in every store (ticker, index code)
//! - `Metric` - Which quantity a store holds ("Adj Close", "EPS")
//! - `ObservationDate` - An instant normalized to UTC, used as a key
//! - `PointValue` - A cached daily value or the "fetched, no data" marker
//! - `Bound` / `Interval` - A value valid over a half-open date range

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Symbol
// =============================================================================

/// Opaque, case-sensitive instrument identifier (e.g. "GOOG", "^GSPC").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Metric
// =============================================================================

/// Name of the quantity a store holds. One store instance serves one metric.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metric(pub String);

impl Metric {
    pub fn new(metric: impl Into<String>) -> Self {
        Self(metric.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Metric {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// ObservationDate
// =============================================================================

/// A timezone-aware observation instant normalized to UTC.
///
/// Two dates are equal iff they are the same instant, whatever timezone they
/// were built from. Sub-second precision is dropped on construction so that
/// the value survives a trip through the storage string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationDate(DateTime<Utc>);

impl ObservationDate {
    const STORAGE_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%SZ";

    pub fn new<Tz: TimeZone>(instant: DateTime<Tz>) -> Self {
        let utc = instant.with_timezone(&Utc);
        Self(utc.with_nanosecond(0).unwrap_or(utc))
    }

    /// Midnight UTC on the given calendar day.
    pub fn from_naive_date(date: NaiveDate) -> Self {
        Self(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
    }

    /// Midnight UTC on the given day. Returns None if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_naive_date)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// UTC calendar day of the instant.
    pub fn day(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Midnight UTC of the following day.
    pub fn start_of_next_day(&self) -> Self {
        Self::from_naive_date(self.day()) + Duration::days(1)
    }

    /// Fixed-width UTC form ("2012-12-03T00:00:00Z"); sorts chronologically
    /// as a plain string.
    pub fn to_storage_string(&self) -> String {
        self.0.format(Self::STORAGE_FORMAT).to_string()
    }

    /// Parses any RFC 3339 timestamp and normalizes it to UTC.
    pub fn parse(s: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(s.trim()).ok().map(Self::new)
    }

    /// Parses either an RFC 3339 timestamp or a bare "YYYY-MM-DD" day.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        Self::parse(s).or_else(|| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .ok()
                .map(Self::from_naive_date)
        })
    }
}

impl std::ops::Add<Duration> for ObservationDate {
    type Output = ObservationDate;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::new(self.0 + rhs)
    }
}

impl fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ObservationDate {
    fn from(instant: DateTime<Tz>) -> Self {
        Self::new(instant)
    }
}

impl From<NaiveDate> for ObservationDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive_date(date)
    }
}

// =============================================================================
// PointValue
// =============================================================================

/// A stored daily value.
///
/// `NoData` means the fetcher was asked and had nothing for the date. A date
/// that was never fetched has no `PointValue` at all: stores leave it out of
/// their result map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointValue {
    Value(f64),
    NoData,
}

impl PointValue {
    /// NaN is not a value; it is folded into `NoData`.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            PointValue::NoData
        } else {
            PointValue::Value(value)
        }
    }

    pub fn from_option(value: Option<f64>) -> Self {
        value.map(Self::from_f64).unwrap_or(PointValue::NoData)
    }

    pub fn as_option(&self) -> Option<f64> {
        match self {
            PointValue::Value(v) => Some(*v),
            PointValue::NoData => None,
        }
    }

    /// Caller-facing form: `NoData` becomes NaN.
    pub fn to_f64(&self) -> f64 {
        self.as_option().unwrap_or(f64::NAN)
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, PointValue::NoData)
    }
}

// =============================================================================
// Interval
// =============================================================================

/// One end of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bound {
    /// Open-ended: before any tracked history (as a start) or until
    /// superseded (as an end).
    Unbounded,
    At(ObservationDate),
}

impl Bound {
    pub fn from_option(date: Option<ObservationDate>) -> Self {
        date.map(Bound::At).unwrap_or(Bound::Unbounded)
    }

    pub fn as_option(&self) -> Option<ObservationDate> {
        match self {
            Bound::Unbounded => None,
            Bound::At(date) => Some(*date),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }
}

impl From<ObservationDate> for Bound {
    fn from(date: ObservationDate) -> Self {
        Bound::At(date)
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Unbounded => write!(f, "-"),
            Bound::At(date) => write!(f, "{}", date),
        }
    }
}

/// A value valid over `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: Bound,
    pub end: Bound,
    pub value: f64,
}

impl Interval {
    pub fn new(start: impl Into<Bound>, end: impl Into<Bound>, value: f64) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            value,
        }
    }

    /// `start <= date < end`, where an unbounded side always matches.
    pub fn contains(&self, date: ObservationDate) -> bool {
        let after_start = match self.start {
            Bound::Unbounded => true,
            Bound::At(start) => start <= date,
        };
        let before_end = match self.end {
            Bound::Unbounded => true,
            Bound::At(end) => date < end,
        };
        after_start && before_end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) = {}", self.start, self.end, self.value)
    }
}
