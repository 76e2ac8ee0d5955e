//! PriceBar — one trading-day observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV observation for a single ticker.
///
/// Dates are timezone-naive exchange-local calendar dates. A series of bars is
/// ordered strictly by ascending date with no duplicates; the fetch layer
/// enforces that before any indicator sees the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Returns true if any price field is NaN or infinite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite())
    }

    /// OHLC sanity: positive prices, high >= max(open, close), low <= min(open, close).
    ///
    /// This is the data source's responsibility; cleaning reports offenders but keeps them.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
            && self.open > 0.0
            && self.close > 0.0
            && self.low > 0.0
    }
}

/// Returns true if dates are strictly ascending (sorted, no duplicates).
pub fn is_strictly_ascending(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}
