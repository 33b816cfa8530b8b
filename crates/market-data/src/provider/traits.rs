//! Market data provider trait definitions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::DailyBar;

/// Trait for providers of daily price history.
///
/// Implement this trait to add support for a new market data source.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use fundamentals_market_data::{DailyBar, MarketDataError, PriceHistoryProvider};
///
/// struct MyProvider {
///     api_key: String,
/// }
///
/// #[async_trait]
/// impl PriceHistoryProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     async fn get_daily_bars(&self, symbol: &str, start: DateTime<Utc>, end: DateTime<Utc>)
///         -> Result<Vec<DailyBar>, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and errors.
    fn id(&self) -> &'static str;

    /// Fetch daily bars for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The provider symbol (e.g., "GOOG", "^GSPC")
    /// * `start` - Start of the range (inclusive)
    /// * `end` - End of the range (exclusive)
    ///
    /// # Returns
    ///
    /// Bars ordered by timestamp ascending. A range with no trading days is
    /// reported as [`MarketDataError::NoDataForRange`].
    async fn get_daily_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>, MarketDataError>;
}

#[async_trait]
impl<T: PriceHistoryProvider + ?Sized> PriceHistoryProvider for Arc<T> {
    fn id(&self) -> &'static str {
        (**self).id()
    }

    async fn get_daily_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyBar>, MarketDataError> {
        (**self).get_daily_bars(symbol, start, end).await
    }
}
