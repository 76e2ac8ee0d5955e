//! Ticker universe for scans and portfolio generation.
//!
//! The default universe is 40 liquid Pakistan Stock Exchange listings. A
//! custom list can be loaded from a TOML file with a `tickers` array.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ConfigError;

pub const DEFAULT_PSX_TICKERS: [&str; 40] = [
    "HBL", "OGDC", "PSO", "ENGRO", "MCB", "UBL", "LUCK", "FFC", "MEBL", "PPL", //
    "HUBC", "MARI", "TRG", "SYS", "EFERT", "KAPCO", "NBP", "BAFL", "ABL", "SNGP", //
    "POL", "DGKC", "MLCF", "PTC", "KEL", "FCCL", "HASCOL", "APL", "ICI", "DAWH", //
    "CHCC", "COLG", "NML", "NESTLE", "FHAM", "PIOC", "PAEL", "BYCO", "SEARL", "SHEL",
];

/// Exchange-agnostic ticker: the text before the first `.`, upper-cased.
pub fn base_ticker(ticker: &str) -> String {
    ticker
        .trim()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Universe {
    pub tickers: Vec<String>,
}

impl Universe {
    /// Normalized, de-duplicated, order preserved.
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in tickers {
            let base = base_ticker(t.as_ref());
            if !base.is_empty() && !out.contains(&base) {
                out.push(base);
            }
        }
        Self { tickers: out }
    }

    pub fn default_psx() -> Self {
        Self::new(DEFAULT_PSX_TICKERS)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: Universe = toml::from_str(content)?;
        let universe = Self::new(raw.tickers);
        if universe.is_empty() {
            return Err(ConfigError::Invalid(
                "universe must list at least one ticker".into(),
            ));
        }
        Ok(universe)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn contains(&self, ticker: &str) -> bool {
        let base = base_ticker(ticker);
        self.tickers.iter().any(|t| *t == base)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tickers.iter().map(|t| t.as_str())
    }
}
