//! Requested analysis period.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display period for an analysis. The fetch layer always pulls at least
/// `min_history_days` of history regardless of the period chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }

    /// Calendar days requested from the provider for this period.
    pub fn lookback_days(&self) -> i64 {
        match self {
            Self::OneMonth => 35,
            Self::ThreeMonths => 95,
            Self::SixMonths => 185,
            Self::OneYear => 370,
            Self::TwoYears => 735,
            Self::FiveYears => 1830,
        }
    }

    /// Trading days shown in charts and period high/low.
    pub fn display_bars(&self) -> usize {
        match self {
            Self::OneMonth => 22,
            Self::ThreeMonths => 66,
            Self::SixMonths => 132,
            Self::OneYear => 252,
            Self::TwoYears => 504,
            Self::FiveYears => 1260,
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::OneYear
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown period '{s}' (expected 1mo, 3mo, 6mo, 1y, 2y or 5y)"))
    }
}
