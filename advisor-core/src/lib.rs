//! Advisor Core — price data, indicators, and the rule-based decision engine.
//!
//! This crate contains the deterministic heart of the advisor:
//! - Domain types (price bars, indicator rows, decisions, signals)
//! - Indicator Engine: SMA, EMA, RSI, MACD with an explicit fill chain
//! - Decision Engine: stateless weighted rule scoring
//! - Data layer: provider trait, Yahoo/CSV/synthetic providers, fetch layer
//! - Market news feed and TOML configuration
//!
//! Nothing here owns a thread pool; fan-out lives in `advisor-runner`.

pub mod config;
pub mod data;
pub mod decision;
pub mod domain;
pub mod indicators;
pub mod news;

pub use config::{AdvisorConfig, AllocationMode, ConfigError};
pub use data::{DataError, Period, PriceHistory, PriceSource};
pub use decision::analyze;
pub use domain::{Decision, IndicatorRow, PriceBar, Signal, SignalTone, Verdict};
pub use indicators::{add_all_indicators, IndicatorError, IndicatorFrame};
