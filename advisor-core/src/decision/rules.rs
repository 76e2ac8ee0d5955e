//! Weighted scoring rubric over the latest two indicator rows.
//!
//! | Rule | Buy | Sell |
//! |---|---|---|
//! | SMA(5)/SMA(20) crossover | +4 with volume > 1.2x avg, else +2 | +4 |
//! | Price vs SMA stack | +2 | +2 |
//! | RSI oversold / overbought | +3 | +3 |
//! | RSI mild lean (outside 45..=55) | +1 | +1 |
//! | MACD fresh cross | +3 | +3 |
//! | MACD steady above / below signal | +1 | +1 |
//! | Volume > 1.5x avg | +1 if close rose | +1 if close fell or flat |
//!
//! Rules accumulate independently; only the RSI and MACD tiers short-circuit.

use crate::domain::{Decision, IndicatorRow, Signal, Verdict};

/// Trailing window for the volume average (includes today).
pub const VOLUME_WINDOW: usize = 20;
/// Volume multiple that qualifies a bullish SMA crossover.
pub const CROSSOVER_VOLUME_MULTIPLE: f64 = 1.2;
/// Volume multiple that counts as a high-volume session.
pub const HIGH_VOLUME_MULTIPLE: f64 = 1.5;

pub const RSI_OVERSOLD: f64 = 35.0;
pub const RSI_OVERBOUGHT: f64 = 65.0;
pub const RSI_NEUTRAL_LOW: f64 = 45.0;
pub const RSI_NEUTRAL_HIGH: f64 = 55.0;

/// Minimum winning score for a non-HOLD verdict.
pub const MIN_SCORE: u32 = 2;
pub const BASE_CONFIDENCE: u32 = 60;
pub const CONFIDENCE_PER_POINT: u32 = 5;
pub const MAX_CONFIDENCE: u32 = 95;
pub const HOLD_CONFIDENCE: u8 = 50;

/// Accumulated points and signal text from one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scorecard {
    pub buy: u32,
    pub sell: u32,
    pub signals: Vec<Signal>,
}

impl Scorecard {
    fn buy(&mut self, points: u32, text: impl Into<String>) {
        self.buy += points;
        self.signals.push(Signal::new(text));
    }

    fn sell(&mut self, points: u32, text: impl Into<String>) {
        self.sell += points;
        self.signals.push(Signal::new(text));
    }

    fn note(&mut self, text: impl Into<String>) {
        self.signals.push(Signal::new(text));
    }
}

/// Evaluate the rubric and turn the scores into a decision.
///
/// Pure: the result depends only on the last two rows and the trailing volume
/// average, and nothing is retained between calls.
///
/// # Panics
/// If `rows` has fewer than 2 entries. The fetch layer guarantees at least
/// `min_rows` bars, so this is a programming error rather than a data condition.
pub fn analyze(rows: &[IndicatorRow]) -> Decision {
    let card = score(rows);
    let (decision, confidence) = decide(card.buy, card.sell);
    Decision {
        decision,
        confidence,
        signals: card.signals,
    }
}

/// Run every rule against the latest two rows.
///
/// # Panics
/// If `rows` has fewer than 2 entries.
pub fn score(rows: &[IndicatorRow]) -> Scorecard {
    assert!(
        rows.len() >= 2,
        "decision rules need at least 2 rows, got {}",
        rows.len()
    );
    let today = &rows[rows.len() - 1];
    let yesterday = &rows[rows.len() - 2];
    let avg_volume = trailing_volume_average(rows, VOLUME_WINDOW);
    let volume = today.volume() as f64;
    let price = today.close();

    let mut card = Scorecard::default();

    // SMA crossover
    if yesterday.sma_5 <= yesterday.sma_20 && today.sma_5 > today.sma_20 {
        if volume > avg_volume * CROSSOVER_VOLUME_MULTIPLE {
            card.buy(4, "BULLISH: SMA(5) crossed above SMA(20) with high volume");
        } else {
            card.buy(2, "CAUTION: SMA(5) crossed above SMA(20) but volume is low");
        }
    } else if yesterday.sma_5 >= yesterday.sma_20 && today.sma_5 < today.sma_20 {
        card.sell(4, "BEARISH: SMA(5) crossed below SMA(20)");
    }

    // Price position relative to the SMA stack
    if price > today.sma_5 && today.sma_5 > today.sma_20 {
        card.buy(2, "BULLISH: Price > SMA(5) > SMA(20) - strong uptrend");
    } else if price < today.sma_5 && today.sma_5 < today.sma_20 {
        card.sell(2, "BEARISH: Price < SMA(5) < SMA(20) - strong downtrend");
    }

    // RSI tiers
    let rsi = today.rsi;
    if rsi < RSI_OVERSOLD {
        card.buy(3, format!("BULLISH: RSI is oversold ({rsi:.2})"));
    } else if rsi > RSI_OVERBOUGHT {
        card.sell(3, format!("BEARISH: RSI is overbought ({rsi:.2})"));
    } else if (RSI_NEUTRAL_LOW..=RSI_NEUTRAL_HIGH).contains(&rsi) {
        card.note(format!("NEUTRAL: RSI is neutral ({rsi:.2})"));
    } else if rsi < RSI_NEUTRAL_LOW {
        card.buy(1, format!("CAUTION: RSI trending lower ({rsi:.2})"));
    } else {
        card.sell(1, format!("CAUTION: RSI trending higher ({rsi:.2})"));
    }

    // MACD tiers
    let (macd, signal) = (today.macd, today.macd_signal);
    let (prev_macd, prev_signal) = (yesterday.macd, yesterday.macd_signal);
    if macd > signal && prev_macd <= prev_signal {
        card.buy(3, "BULLISH: MACD crossed above signal line");
    } else if macd < signal && prev_macd >= prev_signal {
        card.sell(3, "BEARISH: MACD crossed below signal line");
    } else if macd > signal {
        card.buy(1, "BULLISH: MACD above signal line");
    } else {
        card.sell(1, "BEARISH: MACD below signal line");
    }

    // High-volume momentum
    if volume > avg_volume * HIGH_VOLUME_MULTIPLE {
        card.note("INFO: High volume detected - strong momentum");
        if price > yesterday.close() {
            card.buy += 1;
        } else {
            card.sell += 1;
        }
    }

    card
}

/// Map scores to a verdict and confidence.
///
/// Ties always HOLD at 50. The winner needs at least `MIN_SCORE` points.
pub fn decide(buy: u32, sell: u32) -> (Verdict, u8) {
    if buy > sell && buy >= MIN_SCORE {
        (Verdict::Buy, confidence_for(buy))
    } else if sell > buy && sell >= MIN_SCORE {
        (Verdict::Sell, confidence_for(sell))
    } else {
        (Verdict::Hold, HOLD_CONFIDENCE)
    }
}

fn confidence_for(score: u32) -> u8 {
    let raw = BASE_CONFIDENCE.saturating_add(score.saturating_mul(CONFIDENCE_PER_POINT));
    raw.min(MAX_CONFIDENCE) as u8
}

/// Mean volume of the last `window` rows (fewer if the series is shorter).
pub fn trailing_volume_average(rows: &[IndicatorRow], window: usize) -> f64 {
    let tail = &rows[rows.len().saturating_sub(window)..];
    if tail.is_empty() {
        return 0.0;
    }
    tail.iter().map(|r| r.volume() as f64).sum::<f64>() / tail.len() as f64
}
