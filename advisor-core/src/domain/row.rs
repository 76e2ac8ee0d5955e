//! IndicatorRow — a PriceBar with its derived indicator values.

use serde::{Deserialize, Serialize};

use super::PriceBar;

/// One bar plus every indicator the decision rules read.
///
/// Rows are produced once per fetch over the whole available history and never
/// mutated afterwards; new history means a full recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    #[serde(flatten)]
    pub bar: PriceBar,
    pub sma_5: f64,
    pub sma_20: f64,
    pub ema_12: f64,
    pub ema_26: f64,
    /// 14-period oscillator, bounded [0, 100].
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
}

impl IndicatorRow {
    pub fn close(&self) -> f64 {
        self.bar.close
    }

    pub fn volume(&self) -> u64 {
        self.bar.volume
    }
}
