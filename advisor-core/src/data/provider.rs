//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, CSV import,
//! synthetic walks) so the fetch layer can swap implementations and tests can
//! substitute scripted providers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily bar as delivered by a provider, before validation and cleaning.
///
/// Fields are optional: providers may return partial rows (holidays, missing
/// columns) that the fetch layer fills or rejects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    /// Fully populated bar.
    pub fn complete(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Number of missing OHLCV cells (0..=5).
    pub fn missing_cells(&self) -> usize {
        [
            self.open.is_none(),
            self.high.is_none(),
            self.low.is_none(),
            self.close.is_none(),
            self.volume.is_none(),
        ]
        .iter()
        .filter(|m| **m)
        .count()
    }

    /// Bar with every field missing.
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing_cells() == 5
    }
}

/// Structured error types for data operations.
///
/// Messages are shown to users as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("csv import error: {0}")]
    CsvError(String),

    /// No usable rows, or rows failed validation.
    #[error("{0}")]
    DataUnavailable(String),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Deterministic failures that a retry cannot fix.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable(_) | Self::CircuitBreakerTripped | Self::AuthenticationRequired(_)
        )
    }
}

/// Result of a successful data fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

/// Trait for data providers (Yahoo Finance, CSV import, etc).
///
/// Implementations handle the specifics of one source. Symbol resolution,
/// retries, validation and cleaning live in the fetch layer above this trait.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for an exact provider symbol over `[start, end)`.
    ///
    /// An empty `bars` vector means the symbol resolved but had no rows.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
