//! Market Scanner: bounded parallel fan-out over the ticker universe.
//!
//! Each task is one independent fetch → indicators → decision pipeline. Tasks
//! share only the read-only ticker list and the price source. A failing ticker
//! is dropped from the aggregate and never cancels its siblings.

use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use advisor_core::data::{Period, PriceSource};
use advisor_core::domain::Verdict;

use crate::analysis::{run_pipeline, AnalysisError, TickerAnalysis};

/// Which verdicts a scan keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanFilter {
    #[default]
    All,
    Buy,
    Sell,
}

impl ScanFilter {
    pub fn accepts(&self, verdict: Verdict) -> bool {
        match self {
            Self::All => true,
            Self::Buy => verdict == Verdict::Buy,
            Self::Sell => verdict == Verdict::Sell,
        }
    }
}

impl FromStr for ScanFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(format!("unknown scan filter '{other}' (expected all, buy or sell)")),
        }
    }
}

/// One scanned ticker. Field names are a stable contract for JSON consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRow {
    pub ticker: String,
    pub price: f64,
    pub change_percent: f64,
    pub signal: Verdict,
    pub confidence: u8,
    pub rsi: f64,
    pub volume: u64,
}

impl ScanRow {
    pub fn from_analysis(ticker: &str, result: &TickerAnalysis, change_lookback: usize) -> Self {
        let latest = result.latest();
        Self {
            ticker: ticker.to_string(),
            price: latest.close(),
            change_percent: result.change_percent(change_lookback),
            signal: result.decision.decision,
            confidence: result.decision.confidence,
            rsi: latest.rsi,
            volume: latest.volume(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub results: Vec<ScanRow>,
    pub count: usize,
    /// Tickers dropped because their fetch or analysis failed.
    pub skipped: usize,
}

/// Run `task` for every ticker on a pool of at most `max_workers` threads.
///
/// Results pair each ticker with its outcome; callers must not rely on the
/// order of completion.
pub fn fan_out<T, F>(
    tickers: &[String],
    max_workers: usize,
    task: F,
) -> Vec<(String, Result<T, AnalysisError>)>
where
    T: Send,
    F: Fn(&str) -> Result<T, AnalysisError> + Sync,
{
    let run = |ticker: &String| (ticker.clone(), task(ticker));

    if max_workers <= 1 {
        return tickers.iter().map(run).collect();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .build()
    {
        Ok(pool) => pool.install(|| tickers.par_iter().map(run).collect()),
        Err(e) => {
            tracing::warn!(error = %e, "failed to build worker pool, scanning sequentially");
            tickers.iter().map(run).collect()
        }
    }
}

pub struct MarketScanner {
    source: Arc<dyn PriceSource>,
    max_workers: usize,
    change_lookback: usize,
}

impl MarketScanner {
    pub fn new(source: Arc<dyn PriceSource>, max_workers: usize, change_lookback: usize) -> Self {
        Self {
            source,
            max_workers: max_workers.max(1),
            change_lookback,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Full pipeline for every ticker; failures are logged and dropped.
    pub fn analyze_all(&self, tickers: &[String], period: Period) -> Vec<(String, TickerAnalysis)> {
        let source = self.source.as_ref();
        let outcomes = fan_out(tickers, self.max_workers, |ticker| {
            run_pipeline(source, ticker, period)
        });

        let mut ok = Vec::with_capacity(outcomes.len());
        for (ticker, outcome) in outcomes {
            match outcome {
                Ok(result) => ok.push((ticker, result)),
                Err(e) => tracing::debug!(%ticker, error = %e, "ticker dropped from scan"),
            }
        }
        ok
    }

    /// Scan the universe and keep rows matching `filter`, strongest first.
    pub fn scan(&self, tickers: &[String], period: Period, filter: ScanFilter) -> ScanReport {
        let analyzed = self.analyze_all(tickers, period);
        let skipped = tickers.len() - analyzed.len();

        let mut results: Vec<ScanRow> = analyzed
            .iter()
            .filter(|(_, a)| filter.accepts(a.decision.decision))
            .map(|(ticker, a)| ScanRow::from_analysis(ticker, a, self.change_lookback))
            .collect();
        results.sort_by(|a, b| {
            b.confidence
                .cmp(&a.confidence)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });

        tracing::info!(
            scanned = tickers.len(),
            matched = results.len(),
            skipped,
            ?filter,
            "market scan complete"
        );
        ScanReport {
            count: results.len(),
            results,
            skipped,
        }
    }
}
