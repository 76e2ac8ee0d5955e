//! Price-history fetch layer.
//!
//! Resolves a ticker against the configured exchange suffixes, retries
//! provider failures with linear backoff, validates the raw pull, merges a
//! short refresh pull so the latest session is present, and cleans the result
//! into an ascending `PriceBar` series.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};

use super::period::Period;
use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use super::universe::base_ticker;
use super::validate::{clean, validate};
use crate::config::FetchConfig;
use crate::domain::PriceBar;

/// Calendar slack added to the refresh pull so weekends don't starve it.
const REFRESH_WEEKEND_SLACK_DAYS: i64 = 4;

/// Cleaned daily history for one ticker.
#[derive(Debug, Clone)]
pub struct PriceHistory {
    /// Base ticker as requested (e.g. "HBL").
    pub ticker: String,
    /// Provider symbol that produced the data (e.g. "HBL.KA").
    pub symbol: String,
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
}

/// Source of validated price history, as consumed by the analysis pipeline.
pub trait PriceSource: Send + Sync {
    fn fetch(&self, ticker: &str, period: Period) -> Result<PriceHistory, DataError>;
}

pub struct StockFetcher {
    provider: Arc<dyn DataProvider>,
    config: FetchConfig,
    reference_date: Option<NaiveDate>,
}

impl StockFetcher {
    pub fn new(provider: Arc<dyn DataProvider>, config: FetchConfig) -> Self {
        Self {
            provider,
            config,
            reference_date: None,
        }
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// `[start, end)` requested for a period. `end` is the day after the
    /// reference date so today's session is included.
    pub fn request_range(&self, period: Period) -> (NaiveDate, NaiveDate) {
        let today = self
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        let end = today + chrono::Duration::days(1);
        let days = period.lookback_days().max(self.config.min_history_days);
        (end - chrono::Duration::days(days), end)
    }

    /// First suffix that yields rows wins. `Ok(None)` when every suffix came
    /// back empty or unknown.
    fn resolve(
        &self,
        base: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<FetchResult>, DataError> {
        let mut transient = None;
        for suffix in &self.config.symbol_suffixes {
            let symbol = format!("{base}{suffix}");
            match self.provider.fetch(&symbol, start, end) {
                Ok(result) if result.bars.iter().any(|b| !b.is_empty()) => {
                    return Ok(Some(result));
                }
                Ok(_) | Err(DataError::SymbolNotFound { .. }) => {
                    tracing::debug!(%symbol, "no rows for symbol format");
                }
                Err(e) if e.is_permanent() => return Err(e),
                Err(e) => {
                    tracing::debug!(%symbol, error = %e, "symbol format failed");
                    transient = Some(e);
                }
            }
        }
        match transient {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    /// Latest few sessions for a resolved symbol. Failures are logged and ignored.
    fn refresh_tail(&self, symbol: &str, end: NaiveDate) -> Vec<RawBar> {
        if self.config.refresh_tail_days == 0 {
            return Vec::new();
        }
        let start =
            end - chrono::Duration::days(self.config.refresh_tail_days + REFRESH_WEEKEND_SLACK_DAYS);
        match self.provider.fetch(symbol, start, end) {
            Ok(result) => result.bars,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "refresh pull failed, keeping history as is");
                Vec::new()
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.config.retry_delay_ms.saturating_mul(u64::from(attempt)))
    }
}

impl PriceSource for StockFetcher {
    fn fetch(&self, ticker: &str, period: Period) -> Result<PriceHistory, DataError> {
        let base = base_ticker(ticker);
        if base.is_empty() {
            return Err(DataError::DataUnavailable("Ticker symbol is empty".into()));
        }
        let (start, end) = self.request_range(period);
        let rules = self.config.validation_rules();
        let mut last_error: Option<DataError> = None;

        for attempt in 0..self.config.max_retries {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                tracing::warn!(
                    ticker = %base,
                    attempt = attempt + 1,
                    ?delay,
                    "retrying price fetch"
                );
                std::thread::sleep(delay);
            }
            tracing::debug!(ticker = %base, %start, %end, attempt = attempt + 1, "fetching price history");

            match self.resolve(&base, start, end) {
                Ok(Some(result)) => {
                    // deterministic: a retry would see the same rows
                    validate(&result.bars, &rules)?;
                    let mut raw = result.bars;
                    if attempt == 0 {
                        raw.extend(self.refresh_tail(&result.symbol, end));
                    }
                    let bars = clean(raw)?;
                    tracing::debug!(
                        ticker = %base,
                        symbol = %result.symbol,
                        bars = bars.len(),
                        "price history ready"
                    );
                    return Ok(PriceHistory {
                        ticker: base,
                        symbol: result.symbol,
                        bars,
                        source: result.source,
                    });
                }
                Ok(None) => last_error = None,
                Err(e) if e.is_permanent() => return Err(e),
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) => DataError::DataUnavailable(format!("Error fetching data: {e}")),
            None => DataError::DataUnavailable(format!(
                "No data found for {base} with any symbol format"
            )),
        })
    }
}
