//! Support and resistance levels.
//!
//! Support is the lowest low and resistance the highest high of a centered
//! rolling window evaluated at the last bar. A centered window of `w` bars at
//! the final index only sees the trailing `w / 2 + 1` bars. Series shorter
//! than `w` use their overall extremes.

use serde::{Deserialize, Serialize};

use crate::domain::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Levels {
    pub support: f64,
    pub resistance: f64,
}

/// Current support/resistance. `None` for an empty series.
pub fn support_resistance(bars: &[PriceBar], window: usize) -> Option<Levels> {
    if bars.is_empty() {
        return None;
    }
    let tail = if bars.len() < window {
        bars
    } else {
        let span = window / 2 + 1;
        &bars[bars.len() - span..]
    };

    let support = tail.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let resistance = tail
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);
    Some(Levels {
        support,
        resistance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn short_series_uses_overall_extremes() {
        // make_bars: high = max(open, close) + 1, low = min(open, close) - 1
        let bars = make_bars(&[10.0, 20.0, 15.0]);
        let levels = support_resistance(&bars, 20).unwrap();
        assert_eq!(levels.support, 9.0);
        assert_eq!(levels.resistance, 21.0);
    }

    #[test]
    fn long_series_uses_trailing_half_window() {
        let mut closes: Vec<f64> = vec![1.0];
        closes.extend((0..29).map(|i| 50.0 + i as f64));
        let bars = make_bars(&closes);
        let levels = support_resistance(&bars, 20).unwrap();
        // last 11 bars: closes 68..=78, opens 67..=77
        assert_eq!(levels.support, 66.0);
        assert_eq!(levels.resistance, 79.0);
    }

    #[test]
    fn empty_is_none() {
        assert!(support_resistance(&[], 20).is_none());
    }
}
