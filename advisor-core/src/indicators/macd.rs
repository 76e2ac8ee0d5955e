//! Moving Average Convergence/Divergence (MACD).
//!
//! Three lines (separate Indicator instances, same computation):
//! - Main: EMA(12) - EMA(26)
//! - Signal: EMA(9) of the main line
//! - Histogram: main - signal
//!
//! With fewer than `slow` bars the whole triple is the constant 0 (filled).

use super::ema::ema_of_series;
use super::{Indicator, IndicatorValue, Series};
use crate::domain::PriceBar;

/// Which MACD line to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Main,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize, line: MacdLine) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD spans must be >= 1");
        assert!(slow > fast, "MACD slow span must exceed fast span");
        let suffix = match line {
            MacdLine::Main => "",
            MacdLine::Signal => "_signal",
            MacdLine::Histogram => "_hist",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("macd{suffix}_{fast}_{slow}_{signal}"),
        }
    }

    pub fn main() -> Self {
        Self::new(12, 26, 9, MacdLine::Main)
    }

    pub fn signal() -> Self {
        Self::new(12, 26, 9, MacdLine::Signal)
    }

    pub fn histogram() -> Self {
        Self::new(12, 26, 9, MacdLine::Histogram)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        self.slow
    }

    fn compute(&self, bars: &[PriceBar]) -> Series {
        let n = bars.len();
        if n < self.slow {
            return vec![IndicatorValue::Filled(0.0); n];
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        let main: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();

        let out = match self.line {
            MacdLine::Main => main,
            MacdLine::Signal => ema_of_series(&main, self.signal),
            MacdLine::Histogram => {
                let signal = ema_of_series(&main, self.signal);
                main.iter().zip(&signal).map(|(m, s)| m - s).collect()
            }
        };
        out.into_iter().map(IndicatorValue::Computed).collect()
    }
}
