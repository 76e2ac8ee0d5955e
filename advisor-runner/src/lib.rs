//! Advisor Runner — orchestration on top of `advisor-core`.
//!
//! This crate provides:
//! - Price source selection (Yahoo, CSV directory, synthetic)
//! - Single-ticker analysis pipeline and presentation record
//! - Market Scanner over a bounded worker pool
//! - Portfolio Allocator with pluggable weighting
//! - Response envelopes and CSV/JSON/Markdown export

pub mod analysis;
pub mod data_loader;
pub mod export;
pub mod portfolio;
pub mod report;
pub mod scanner;
pub mod weighting;

pub use analysis::{analyze_stock, run_pipeline, AnalysisError, StockAnalysis, TickerAnalysis};
pub use data_loader::{build_price_source, LoadError, LoadOptions};
pub use portfolio::{
    allocate, generate_portfolio, validate_request, Opportunity, Portfolio, PortfolioError,
    PortfolioItem, PortfolioSummary, RiskTier,
};
pub use report::{Envelope, NewsPayload, ScanPayload, UniversePayload};
pub use scanner::{fan_out, MarketScanner, ScanFilter, ScanReport, ScanRow};
pub use weighting::Weighting;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn records_are_send_sync() {
        assert_send::<TickerAnalysis>();
        assert_sync::<TickerAnalysis>();
        assert_send::<ScanRow>();
        assert_sync::<ScanRow>();
        assert_send::<Portfolio>();
        assert_sync::<Portfolio>();
        assert_send::<StockAnalysis>();
        assert_sync::<StockAnalysis>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<AnalysisError>();
        assert_sync::<AnalysisError>();
        assert_send::<PortfolioError>();
        assert_sync::<PortfolioError>();
        assert_send::<LoadError>();
        assert_sync::<LoadError>();
    }

    #[test]
    fn scanner_is_send_sync() {
        assert_send::<MarketScanner>();
        assert_sync::<MarketScanner>();
    }
}
