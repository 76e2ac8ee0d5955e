//! Advisor configuration loaded from TOML.
//!
//! Every section is optional; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::data::universe::DEFAULT_PSX_TICKERS;
use crate::data::{Period, ValidationRules};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Tickers scanned by `scan` and `portfolio`.
    pub universe: Vec<String>,
    pub fetch: FetchConfig,
    pub scan: ScanConfig,
    pub portfolio: PortfolioConfig,
    pub news: NewsConfig,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            universe: DEFAULT_PSX_TICKERS.iter().map(|t| t.to_string()).collect(),
            fetch: FetchConfig::default(),
            scan: ScanConfig::default(),
            portfolio: PortfolioConfig::default(),
            news: NewsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Attempts per ticker for provider failures.
    pub max_retries: u32,
    /// Linear backoff unit: attempt `n` waits `n * retry_delay_ms`.
    pub retry_delay_ms: u64,
    pub min_rows: usize,
    pub max_missing_pct: f64,
    /// Calendar days always requested so indicators can warm up.
    pub min_history_days: i64,
    /// Trading days in the refresh pull merged over the history.
    pub refresh_tail_days: i64,
    /// Exchange suffixes tried in order when resolving a ticker.
    pub symbol_suffixes: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 1000,
            min_rows: 20,
            max_missing_pct: 50.0,
            min_history_days: 370,
            refresh_tail_days: 5,
            symbol_suffixes: vec![".KA".into(), ".KARACHI".into(), String::new()],
        }
    }
}

impl FetchConfig {
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            min_rows: self.min_rows,
            max_missing_pct: self.max_missing_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub max_workers: usize,
    pub period: Period,
    /// Bars back for the scan row's percent change.
    pub change_lookback_bars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_workers: 10,
            period: Period::SixMonths,
            change_lookback_bars: 22,
        }
    }
}

/// Which allocation strategy the portfolio command applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Equal split across every BUY ticker, regardless of risk tier.
    #[default]
    EqualAll,
    /// Top-N selection and weighting per risk tier.
    RiskTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub min_budget: f64,
    pub period: Period,
    pub allocation: AllocationMode,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            min_budget: 1000.0,
            period: Period::OneYear,
            allocation: AllocationMode::EqualAll,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub feeds: Vec<String>,
    pub keywords: Vec<String>,
    pub max_entries: usize,
    pub summary_chars: usize,
    pub source_label: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            feeds: vec!["https://www.dawn.com/feeds/business".into()],
            keywords: [
                "psx",
                "pakistan stock exchange",
                "karachi stock exchange",
                "stock market",
                "stocks",
                "shares",
                "trading",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            max_entries: 20,
            summary_chars: 250,
            source_label: "PSX Market News".into(),
        }
    }
}

impl AdvisorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Short content hash, handy for telling configurations apart in logs.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex()[..12].to_string()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.fetch.max_retries == 0 {
            return invalid("fetch.max_retries must be at least 1");
        }
        if self.fetch.min_rows < 2 {
            return invalid("fetch.min_rows must be at least 2");
        }
        if !(0.0..=100.0).contains(&self.fetch.max_missing_pct) {
            return invalid("fetch.max_missing_pct must be within 0..=100");
        }
        if self.fetch.min_history_days <= 0 {
            return invalid("fetch.min_history_days must be positive");
        }
        if self.fetch.refresh_tail_days < 0 {
            return invalid("fetch.refresh_tail_days must not be negative");
        }
        if self.fetch.symbol_suffixes.is_empty() {
            return invalid("fetch.symbol_suffixes must not be empty");
        }
        if self.scan.max_workers == 0 {
            return invalid("scan.max_workers must be at least 1");
        }
        if self.scan.change_lookback_bars == 0 {
            return invalid("scan.change_lookback_bars must be at least 1");
        }
        if !(self.portfolio.min_budget.is_finite() && self.portfolio.min_budget > 0.0) {
            return invalid("portfolio.min_budget must be a positive amount");
        }
        if self.news.max_entries == 0 {
            return invalid("news.max_entries must be at least 1");
        }
        if self.universe.is_empty() {
            return invalid("universe must list at least one ticker");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AdvisorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.universe.len(), 40);
        assert_eq!(config.scan.period, Period::SixMonths);
        assert_eq!(config.portfolio.allocation, AllocationMode::EqualAll);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AdvisorConfig::from_toml(
            r#"
            universe = ["HBL", "OGDC"]

            [scan]
            max_workers = 4
            period = "3mo"

            [portfolio]
            allocation = "risk_tier"
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.max_workers, 4);
        assert_eq!(config.scan.period, Period::ThreeMonths);
        assert_eq!(config.scan.change_lookback_bars, 22);
        assert_eq!(config.portfolio.allocation, AllocationMode::RiskTier);
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.universe, vec!["HBL", "OGDC"]);
    }

    #[test]
    fn toml_roundtrip() {
        let config = AdvisorConfig::default();
        let parsed = AdvisorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.fingerprint(), config.fingerprint());
    }

    #[test]
    fn rejects_zero_workers() {
        let err = AdvisorConfig::from_toml("[scan]\nmax_workers = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("max_workers")));
    }

    #[test]
    fn rejects_zero_change_lookback() {
        let err = AdvisorConfig::from_toml("[scan]\nchange_lookback_bars = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("change_lookback_bars")));
    }

    #[test]
    fn rejects_unknown_period() {
        assert!(matches!(
            AdvisorConfig::from_toml("[scan]\nperiod = \"7y\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_empty_suffixes() {
        let err = AdvisorConfig::from_toml("[fetch]\nsymbol_suffixes = []\n").unwrap_err();
        assert!(err.to_string().contains("symbol_suffixes"));
    }
}
