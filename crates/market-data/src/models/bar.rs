use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One trading day of price data for a symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Timestamp reported by the provider (usually the session open, in UTC)
    pub timestamp: DateTime<Utc>,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    /// Close adjusted for splits and dividends
    pub adjclose: f64,

    pub volume: u64,
}

impl DailyBar {
    /// UTC calendar day the bar belongs to.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Returns the requested field of the bar.
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjClose => self.adjclose,
            PriceField::Volume => self.volume as f64,
        }
    }
}

/// Selects which number of a [`DailyBar`] a point series stores.
///
/// The string forms match the column headers used by Yahoo Finance CSV
/// downloads ("Adj Close", "Close", ...), which is also how metrics are
/// named in the stores.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl PriceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::AdjClose => "Adj Close",
            PriceField::Volume => "Volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', '-'], " ").as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            "adj close" | "adjclose" => Ok(PriceField::AdjClose),
            "volume" => Ok(PriceField::Volume),
            other => Err(format!("Unknown price field: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar() -> DailyBar {
        DailyBar {
            timestamp: Utc.with_ymd_and_hms(2012, 12, 3, 14, 30, 0).unwrap(),
            open: 702.24,
            high: 705.89,
            low: 694.11,
            close: 695.25,
            adjclose: 695.25,
            volume: 2_192_500,
        }
    }

    #[test]
    fn test_day_uses_utc_calendar_date() {
        assert_eq!(bar().day(), NaiveDate::from_ymd_opt(2012, 12, 3).unwrap());
    }

    #[test]
    fn test_field_selection() {
        let bar = bar();
        assert_eq!(bar.field(PriceField::Open), 702.24);
        assert_eq!(bar.field(PriceField::AdjClose), 695.25);
        assert_eq!(bar.field(PriceField::Volume), 2_192_500.0);
    }

    #[test]
    fn test_price_field_parses_yahoo_headers() {
        assert_eq!("Adj Close".parse::<PriceField>(), Ok(PriceField::AdjClose));
        assert_eq!("adj_close".parse::<PriceField>(), Ok(PriceField::AdjClose));
        assert_eq!("Close".parse::<PriceField>(), Ok(PriceField::Close));
        assert!("EPS".parse::<PriceField>().is_err());
    }

    #[test]
    fn test_price_field_display_round_trips() {
        for field in [
            PriceField::Open,
            PriceField::High,
            PriceField::Low,
            PriceField::Close,
            PriceField::AdjClose,
            PriceField::Volume,
        ] {
            assert_eq!(field.to_string().parse::<PriceField>(), Ok(field));
        }
    }
}
