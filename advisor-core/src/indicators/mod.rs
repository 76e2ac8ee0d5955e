//! Indicator Engine.
//!
//! Pure functions over an ordered `PriceBar` series. Each indicator produces a
//! same-length series of three-state values (unavailable / filled / computed);
//! `add_all_indicators` resolves them to plain numbers through the fill chain
//! and assembles `IndicatorRow`s.
//!
//! Warm-up rules:
//! - SMA(5), SMA(20), EMA(12), EMA(26): unavailable when the series is shorter than the window
//! - RSI(14): neutral 50 with fewer than 15 bars or when the trailing loss is zero
//! - MACD(12, 26, 9): constant 0 with fewer than 26 bars

pub mod ema;
pub mod fill;
pub mod levels;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::Ema;
pub use fill::{resolve_series, Provenance};
pub use levels::{support_resistance, Levels};
pub use macd::{Macd, MacdLine};
pub use rsi::{Rsi, NEUTRAL_RSI};
pub use sma::Sma;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{IndicatorRow, PriceBar};

/// One indicator observation before gap filling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    /// Not enough history for this indicator.
    Unavailable,
    /// A documented default rather than a formula output.
    Filled(f64),
    /// Produced by the indicator formula.
    Computed(f64),
}

impl IndicatorValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Unavailable => None,
            Self::Filled(v) | Self::Computed(v) => Some(*v),
        }
    }
}

pub type Series = Vec<IndicatorValue>;

/// Trait for single-series indicators.
///
/// `compute` returns a series of the same length as `bars`. No value at bar t
/// may depend on bars after t.
pub trait Indicator: Send + Sync {
    /// Column name, e.g. "sma_20".
    fn name(&self) -> &str;

    /// Bars needed before the formula applies.
    fn min_bars(&self) -> usize;

    fn compute(&self, bars: &[PriceBar]) -> Series;
}

/// Precondition failures. The caller keeps its unmodified input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("close price missing at row {index} ({date})")]
    MissingClose { index: usize, date: NaiveDate },

    #[error("price series not in strictly ascending date order at row {index} ({date})")]
    NotAscending { index: usize, date: NaiveDate },
}

/// Indicator-augmented series plus how every value was obtained.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    pub rows: Vec<IndicatorRow>,
    pub provenance: BTreeMap<String, Vec<Provenance>>,
    /// Indicators whose warm-up exceeds the series length.
    pub short_history: Vec<String>,
}

impl IndicatorFrame {
    /// Series whose value on the last row is not a formula output.
    pub fn latest_defaults(&self) -> Vec<&str> {
        self.provenance
            .iter()
            .filter(|(_, p)| p.last().is_some_and(|p| *p != Provenance::Computed))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn latest(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }
}

/// Compute every indicator over the full series and build the rows.
pub fn add_all_indicators(bars: &[PriceBar]) -> Result<IndicatorFrame, IndicatorError> {
    check_preconditions(bars)?;

    let sma_5 = Sma::new(5);
    let sma_20 = Sma::new(20);
    let ema_12 = Ema::new(12);
    let ema_26 = Ema::new(26);
    let rsi = Rsi::new(14);
    let macd = Macd::main();
    let macd_signal = Macd::signal();
    let macd_hist = Macd::histogram();

    let indicators: [&dyn Indicator; 8] = [
        &sma_5,
        &sma_20,
        &ema_12,
        &ema_26,
        &rsi,
        &macd,
        &macd_signal,
        &macd_hist,
    ];

    let short_history: Vec<String> = indicators
        .iter()
        .filter(|ind| bars.len() < ind.min_bars())
        .map(|ind| ind.name().to_string())
        .collect();
    if !short_history.is_empty() {
        tracing::debug!(bars = bars.len(), indicators = ?short_history, "history shorter than warm-up");
    }

    let mut resolved: Vec<Vec<f64>> = Vec::with_capacity(indicators.len());
    let mut provenance = BTreeMap::new();
    for indicator in indicators {
        let (values, prov) = resolve_series(&indicator.compute(bars));
        resolved.push(values);
        provenance.insert(indicator.name().to_string(), prov);
    }

    let rows = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorRow {
            bar: bar.clone(),
            sma_5: resolved[0][i],
            sma_20: resolved[1][i],
            ema_12: resolved[2][i],
            ema_26: resolved[3][i],
            rsi: resolved[4][i],
            macd: resolved[5][i],
            macd_signal: resolved[6][i],
            macd_hist: resolved[7][i],
        })
        .collect();

    Ok(IndicatorFrame {
        rows,
        provenance,
        short_history,
    })
}

fn check_preconditions(bars: &[PriceBar]) -> Result<(), IndicatorError> {
    if bars.is_empty() {
        return Err(IndicatorError::EmptySeries);
    }
    for (index, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() {
            return Err(IndicatorError::MissingClose {
                index,
                date: bar.date,
            });
        }
        if index > 0 && bars[index - 1].date >= bar.date {
            return Err(IndicatorError::NotAscending {
                index,
                date: bar.date,
            });
        }
    }
    Ok(())
}

/// Create synthetic bars from close prices for testing.
///
/// open = previous close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Plain numbers for assertions; unavailable becomes NaN.
#[cfg(test)]
pub fn values(series: &[IndicatorValue]) -> Vec<f64> {
    series.iter().map(|v| v.value().unwrap_or(f64::NAN)).collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
