//! Single-ticker analysis pipeline.
//!
//! fetch → indicators → decision, strictly in that order. The decision always
//! sees the full fetched history; the display window only trims what is shown.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use advisor_core::data::{DataError, DataSource, Period, PriceHistory, PriceSource};
use advisor_core::domain::{Decision, IndicatorRow};
use advisor_core::indicators::{
    add_all_indicators, support_resistance, IndicatorError, IndicatorFrame, Levels,
};

/// Window for support/resistance levels.
pub const LEVELS_WINDOW: usize = 20;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("indicator computation failed: {0}")]
    Indicator(#[from] IndicatorError),
}

impl AnalysisError {
    /// Suggested next step for a user looking at a single-ticker failure.
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::Data(DataError::DataUnavailable(msg)) if msg.starts_with("Insufficient") => {
                "Try a shorter period, or a ticker with more trading history"
            }
            Self::Data(DataError::CircuitBreakerTripped | DataError::RateLimited { .. }) => {
                "The data provider is refusing requests; wait a while or use --csv-dir"
            }
            Self::Data(_) => "Try a different ticker symbol or a shorter period",
            Self::Indicator(_) => "The price history is malformed; try a different data source",
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct TickerAnalysis {
    pub history: PriceHistory,
    pub frame: IndicatorFrame,
    pub decision: Decision,
}

impl TickerAnalysis {
    /// Last row. The fetch layer guarantees at least `min_rows` bars.
    pub fn latest(&self) -> &IndicatorRow {
        &self.frame.rows[self.frame.rows.len() - 1]
    }

    /// Percent change from the close `lookback` bars back (inclusive of the
    /// latest bar) to the latest close, falling back to the first bar when the
    /// history is too short.
    pub fn change_percent(&self, lookback: usize) -> f64 {
        let rows = &self.frame.rows;
        let latest = rows[rows.len() - 1].close();
        let lookback = lookback.max(1);
        let first = if rows.len() > lookback {
            rows[rows.len() - lookback].close()
        } else {
            rows[0].close()
        };
        if first == 0.0 {
            return 0.0;
        }
        (latest - first) / first * 100.0
    }
}

/// Run fetch → indicators → decision for one ticker.
pub fn run_pipeline(
    source: &dyn PriceSource,
    ticker: &str,
    period: Period,
) -> Result<TickerAnalysis, AnalysisError> {
    let history = source.fetch(ticker, period)?;
    // the rules compare today with yesterday
    if history.bars.len() < 2 {
        return Err(DataError::DataUnavailable(format!(
            "Insufficient data (only {} rows, need at least 2)",
            history.bars.len()
        ))
        .into());
    }
    let frame = add_all_indicators(&history.bars)?;

    let defaults = frame.latest_defaults();
    if !defaults.is_empty() {
        tracing::warn!(
            ticker = %history.ticker,
            bars = history.bars.len(),
            series = ?defaults,
            "decision uses warm-up defaults instead of computed indicator values"
        );
    }

    let decision = advisor_core::decision::analyze(&frame.rows);
    tracing::debug!(
        ticker = %history.ticker,
        verdict = %decision.decision,
        confidence = decision.confidence,
        "ticker analyzed"
    );
    Ok(TickerAnalysis {
        history,
        frame,
        decision,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    pub change_percent: f64,
    /// Highest high over the display window.
    pub high: f64,
    /// Lowest low over the display window.
    pub low: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub sma_5: f64,
    pub sma_20: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub ema_12: f64,
    pub ema_26: f64,
}

impl From<&IndicatorRow> for IndicatorSnapshot {
    fn from(row: &IndicatorRow) -> Self {
        Self {
            sma_5: row.sma_5,
            sma_20: row.sma_20,
            rsi: row.rsi,
            macd: row.macd,
            macd_signal: row.macd_signal,
            ema_12: row.ema_12,
            ema_26: row.ema_26,
        }
    }
}

/// Presentation record for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysis {
    pub ticker: String,
    pub resolved_symbol: String,
    pub data_source: DataSource,
    pub period: Period,
    pub analysis: Decision,
    pub price: PriceSummary,
    pub indicators: IndicatorSnapshot,
    pub levels: Option<Levels>,
    pub latest_date: chrono::NaiveDate,
    /// Indicator series whose latest value is a warm-up default.
    pub warmup_defaults: Vec<String>,
    pub chart_data: Vec<IndicatorRow>,
}

impl StockAnalysis {
    pub fn from_analysis(result: TickerAnalysis, period: Period) -> Self {
        let rows = &result.frame.rows;
        let n = rows.len();
        let latest = &rows[n - 1];
        let previous = if n >= 2 { &rows[n - 2] } else { latest };

        let display = &rows[n.saturating_sub(period.display_bars())..];
        let high = display
            .iter()
            .map(|r| r.bar.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let low = display
            .iter()
            .map(|r| r.bar.low)
            .fold(f64::INFINITY, f64::min);

        let change = latest.close() - previous.close();
        let change_percent = if previous.close() == 0.0 {
            0.0
        } else {
            change / previous.close() * 100.0
        };

        let warmup_defaults = result
            .frame
            .latest_defaults()
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            ticker: result.history.ticker.clone(),
            resolved_symbol: result.history.symbol.clone(),
            data_source: result.history.source,
            period,
            price: PriceSummary {
                current: latest.close(),
                previous: previous.close(),
                change,
                change_percent,
                high,
                low,
                volume: latest.volume(),
            },
            indicators: IndicatorSnapshot::from(latest),
            levels: support_resistance(&result.history.bars, LEVELS_WINDOW),
            latest_date: latest.bar.date,
            warmup_defaults,
            chart_data: display.to_vec(),
            analysis: result.decision,
        }
    }
}

/// Full single-ticker analysis for presentation.
pub fn analyze_stock(
    source: &dyn PriceSource,
    ticker: &str,
    period: Period,
) -> Result<StockAnalysis, AnalysisError> {
    let result = run_pipeline(source, ticker, period)?;
    Ok(StockAnalysis::from_analysis(result, period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::domain::{PriceBar, Verdict};
    use chrono::NaiveDate;

    struct Fixed(Vec<PriceBar>);

    impl PriceSource for Fixed {
        fn fetch(&self, ticker: &str, _period: Period) -> Result<PriceHistory, DataError> {
            Ok(PriceHistory {
                ticker: ticker.to_string(),
                symbol: format!("{ticker}.KA"),
                bars: self.0.clone(),
                source: DataSource::Synthetic,
            })
        }
    }

    fn bars(closes: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn change_percent_uses_lookback_or_first_bar() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let result = run_pipeline(&Fixed(bars(&closes)), "HBL", Period::SixMonths).unwrap();
        // rows[30 - 22] has close 9
        let expected = (30.0 - 9.0) / 9.0 * 100.0;
        assert!((result.change_percent(22) - expected).abs() < 1e-9);
        // lookback longer than history falls back to the first close
        assert!((result.change_percent(40) - 2900.0).abs() < 1e-9);
    }

    #[test]
    fn zero_lookback_compares_latest_bar_with_itself() {
        let closes: Vec<f64> = (1..=30).map(f64::from).collect();
        let result = run_pipeline(&Fixed(bars(&closes)), "HBL", Period::SixMonths).unwrap();
        assert_eq!(result.change_percent(0), 0.0);
        assert_eq!(result.change_percent(1), 0.0);
    }

    #[test]
    fn stock_analysis_trims_display_window() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 7) as f64).collect();
        let analysis = analyze_stock(&Fixed(bars(&closes)), "OGDC", Period::OneMonth).unwrap();
        assert_eq!(analysis.chart_data.len(), 22);
        assert_eq!(analysis.resolved_symbol, "OGDC.KA");
        assert_eq!(analysis.price.current, closes[59]);
        assert_eq!(analysis.price.previous, closes[58]);
        let window_high = closes[38..].iter().cloned().fold(f64::MIN, f64::max) + 1.0;
        assert_eq!(analysis.price.high, window_high);
        assert!(analysis.warmup_defaults.is_empty());
        assert!(analysis.levels.is_some());
    }

    #[test]
    fn flat_history_holds() {
        let analysis = analyze_stock(&Fixed(bars(&[100.0; 40])), "PSO", Period::OneYear).unwrap();
        assert_eq!(analysis.analysis.decision, Verdict::Hold);
        assert_eq!(analysis.analysis.confidence, 50);
        assert_eq!(analysis.indicators.rsi, 50.0);
        assert_eq!(analysis.price.change, 0.0);
    }

    #[test]
    fn remediation_mentions_shorter_period_for_short_history() {
        let err = AnalysisError::Data(DataError::DataUnavailable(
            "Insufficient data (only 10 rows, need at least 20)".into(),
        ));
        assert!(err.remediation().contains("shorter period"));
        assert_eq!(err.to_string(), "Insufficient data (only 10 rows, need at least 20)");
    }
}
