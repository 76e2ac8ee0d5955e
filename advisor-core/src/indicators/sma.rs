//! Simple Moving Average (SMA).
//!
//! Mean of close prices over the last `min(i + 1, period)` bars, so early
//! positions use a shrinking window instead of being undefined.
//! If the whole series is shorter than `period`, every value is unavailable.

use super::{Indicator, IndicatorValue, Series};
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Series {
        let n = bars.len();
        if n < self.period {
            return vec![IndicatorValue::Unavailable; n];
        }

        let mut result = Vec::with_capacity(n);
        let mut sum = 0.0;
        for i in 0..n {
            sum += bars[i].close;
            if i >= self.period {
                sum -= bars[i - self.period].close;
            }
            let count = (i + 1).min(self.period);
            result.push(IndicatorValue::Computed(sum / count as f64));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, values, DEFAULT_EPSILON};

    #[test]
    fn sma_5_shrinking_window() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = values(&Sma::new(5).compute(&bars));

        assert_eq!(result.len(), 7);
        assert_approx(result[0], 10.0, DEFAULT_EPSILON);
        assert_approx(result[1], 10.5, DEFAULT_EPSILON);
        assert_approx(result[3], 11.5, DEFAULT_EPSILON);
        // mean(10..=14)
        assert_approx(result[4], 12.0, DEFAULT_EPSILON);
        assert_approx(result[5], 13.0, DEFAULT_EPSILON);
        assert_approx(result[6], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let bars = make_bars(&[100.0, 200.0, 300.0]);
        let result = values(&Sma::new(1).compute(&bars));
        assert_eq!(result, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn sma_too_few_bars_is_unavailable() {
        let bars = make_bars(&[10.0, 11.0]);
        let result = Sma::new(5).compute(&bars);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|v| *v == IndicatorValue::Unavailable));
    }

    #[test]
    fn sma_exactly_period_bars_is_computed() {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let result = Sma::new(3).compute(&bars);
        assert!(result.iter().all(|v| matches!(v, IndicatorValue::Computed(_))));
        assert_approx(result[2].value().unwrap(), 2.0, DEFAULT_EPSILON);
    }
}
