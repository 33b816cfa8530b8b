//! Yahoo Finance market data provider.
//!
//! Uses the Yahoo Finance chart API (through `yahoo_finance_api`) to fetch
//! daily history for equities, ETFs and indexes (e.g. `GOOG`, `^GSPC`).

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use time::OffsetDateTime;
use tracing::{debug, warn};
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::DailyBar;
use crate::provider::PriceHistoryProvider;

const PROVIDER_ID: &str = "YAHOO";

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self { connector })
    }

    /// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> Result<OffsetDateTime, MarketDataError> {
        OffsetDateTime::from_unix_timestamp(dt.timestamp()).map_err(|e| {
            MarketDataError::ValidationFailed {
                message: format!("Timestamp {} out of range: {}", dt, e),
            }
        })
    }

    /// Convert a Yahoo quote to our bar model.
    fn yahoo_quote_to_bar(yahoo_quote: &yahoo::Quote) -> Result<DailyBar, MarketDataError> {
        let timestamp: DateTime<Utc> = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        if !yahoo_quote.close.is_finite() {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Non-finite close price on {}", timestamp),
            });
        }

        Ok(DailyBar {
            timestamp,
            open: yahoo_quote.open,
            high: yahoo_quote.high,
            low: yahoo_quote.low,
            close: yahoo_quote.close,
            adjclose: yahoo_quote.adjclose,
            volume: yahoo_quote.volume,
        })
    }

    fn map_yahoo_error(symbol: &str, error: yahoo::YahooError) -> MarketDataError {
        match error {
            yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult => {
                MarketDataError::SymbolNotFound(symbol.to_string())
            }
            other => MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_daily_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        debug!(
            "Fetching daily bars for {} from {} to {} from Yahoo",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        if start >= end {
            return Err(MarketDataError::NoDataForRange);
        }

        let start_time = Self::chrono_to_offset_datetime(start)?;
        let end_time = Self::chrono_to_offset_datetime(end)?;

        let response = self
            .connector
            .get_quote_history(symbol, start_time, end_time)
            .await
            .map_err(|e| Self::map_yahoo_error(symbol, e))?;

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let bars: Vec<DailyBar> = yahoo_quotes
                    .iter()
                    .filter_map(|q| match Self::yahoo_quote_to_bar(q) {
                        Ok(bar) => Some(bar),
                        Err(e) => {
                            warn!("Skipping Yahoo quote for {}: {}", symbol, e);
                            None
                        }
                    })
                    .filter(|bar| bar.timestamp >= start && bar.timestamp < end)
                    .collect();

                if bars.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                Ok(bars)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!(
                    "No daily bars returned for '{}' between {} and {}",
                    symbol,
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                );
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
