//! Relative Strength Index (RSI), the oscillator the decision rules read.
//!
//! Day-over-day close deltas; the first bar has no delta and counts as zero
//! gain and zero loss. avg_gain / avg_loss are simple means over the trailing
//! `min(i + 1, period)` deltas, and RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//!
//! Always defined:
//! - fewer than `period + 1` bars → the whole series is neutral 50 (filled)
//! - avg_loss == 0 → ratio undefined → neutral 50 (filled)

use super::{Indicator, IndicatorValue, Series};
use crate::domain::PriceBar;

/// Neutral oscillator value used for warm-up and undefined ratios.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[PriceBar]) -> Series {
        let n = bars.len();
        if n < self.period + 1 {
            return vec![IndicatorValue::Filled(NEUTRAL_RSI); n];
        }

        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let delta = bars[i].close - bars[i - 1].close;
            if delta > 0.0 {
                gains[i] = delta;
            } else if delta < 0.0 {
                losses[i] = -delta;
            }
        }

        // Window sums are recomputed rather than rolled so a window with no
        // losses sums to exactly zero.
        (0..n)
            .map(|i| {
                let start = (i + 1).saturating_sub(self.period);
                let count = (i + 1 - start) as f64;
                let avg_gain = gains[start..=i].iter().sum::<f64>() / count;
                let avg_loss = losses[start..=i].iter().sum::<f64>() / count;
                rsi_value(avg_gain, avg_loss)
            })
            .collect()
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> IndicatorValue {
    if avg_loss == 0.0 {
        IndicatorValue::Filled(NEUTRAL_RSI)
    } else {
        IndicatorValue::Computed(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}
