//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
///
/// Absence ([`SymbolNotFound`](Self::SymbolNotFound),
/// [`NoDataForRange`](Self::NoDataForRange)) is kept apart from failure so
/// that callers caching negative results can tell the two apart.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available for the requested date range.
    /// The symbol exists but has no bars in the specified period.
    #[error("No data for date range")]
    NoDataForRange,

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },
}

impl MarketDataError {
    /// True when the provider is saying "there is nothing here" rather than
    /// failing. Callers that cache negative results treat these as empty data.
    ///
    /// ```
    /// use fundamentals_market_data::MarketDataError;
    ///
    /// assert!(MarketDataError::NoDataForRange.is_absence());
    /// assert!(!MarketDataError::ValidationFailed { message: "NaN close".into() }.is_absence());
    /// ```
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_) | Self::NoDataForRange)
    }
}
