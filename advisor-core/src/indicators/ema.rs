//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (span + 1).
//! Seed: EMA[0] = first close (no SMA warm-up).
//! If the series is shorter than `span`, every value is unavailable.

use super::{Indicator, IndicatorValue, Series};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            span,
            name: format!("ema_{span}"),
        }
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        self.span
    }

    fn compute(&self, bars: &[PriceBar]) -> Series {
        if bars.len() < self.span {
            return vec![IndicatorValue::Unavailable; bars.len()];
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_of_series(&closes, self.span)
            .into_iter()
            .map(IndicatorValue::Computed)
            .collect()
    }
}

/// Seeded EMA over an arbitrary series, defined at every index.
///
/// Used directly by MACD for the 12/26 lines and the 9-span signal line, which
/// have no availability threshold of their own.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return result;
    };

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut prev = first;
    result.push(prev);
    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        result.push(prev);
    }
    result
}
