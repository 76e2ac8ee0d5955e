//! Budget weighting strategies.
//!
//! Each strategy maps a list of confidences (highest first) to weights that
//! sum to 1.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    Equal,
    /// Proportional to confidence.
    ConfidenceWeighted,
    /// Proportional to confidence squared, favoring the strongest signals.
    TopHeavy,
}

impl Weighting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::ConfidenceWeighted => "confidence_weighted",
            Self::TopHeavy => "top_heavy",
        }
    }

    pub fn weights(&self, confidences: &[u8]) -> Vec<f64> {
        let n = confidences.len();
        if n == 0 {
            return Vec::new();
        }
        let raw: Vec<f64> = match self {
            Self::Equal => vec![1.0; n],
            Self::ConfidenceWeighted => confidences.iter().map(|&c| f64::from(c)).collect(),
            Self::TopHeavy => confidences.iter().map(|&c| f64::from(c).powi(2)).collect(),
        };
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return vec![1.0 / n as f64; n];
        }
        raw.into_iter().map(|w| w / total).collect()
    }
}
