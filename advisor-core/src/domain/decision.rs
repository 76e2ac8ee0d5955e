//! Decision output types: verdict, signals, confidence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Buy,
    Sell,
    Hold,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            "HOLD" => Ok(Self::Hold),
            other => Err(format!("unknown verdict '{other}'")),
        }
    }
}

/// Display category of a signal, derived from its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTone {
    Bullish,
    Bearish,
    Neutral,
}

/// Human-readable rule outcome.
///
/// The text carries a directional marker (`BULLISH:`, `BEARISH:`, `NEUTRAL:`,
/// `CAUTION:`, `INFO:`). Tone is for display grouping only and never feeds back
/// into scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signal(String);

impl Signal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn tone(&self) -> SignalTone {
        if self.0.contains("BULLISH") {
            SignalTone::Bullish
        } else if self.0.contains("BEARISH") {
            SignalTone::Bearish
        } else {
            SignalTone::Neutral
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one Decision Engine invocation.
///
/// Confidence lies in [50, 95]: 50 for HOLD, otherwise `min(60 + 5 * score, 95)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub decision: Verdict,
    pub confidence: u8,
    pub signals: Vec<Signal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_from_markers() {
        assert_eq!(Signal::new("BULLISH: x").tone(), SignalTone::Bullish);
        assert_eq!(Signal::new("BEARISH: y").tone(), SignalTone::Bearish);
        assert_eq!(Signal::new("NEUTRAL: RSI is neutral (50.00)").tone(), SignalTone::Neutral);
        assert_eq!(Signal::new("CAUTION: volume is low").tone(), SignalTone::Neutral);
    }

    #[test]
    fn verdict_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Verdict::Buy).unwrap(), "\"BUY\"");
        assert_eq!("sell".parse::<Verdict>().unwrap(), Verdict::Sell);
        assert!("maybe".parse::<Verdict>().is_err());
    }

    #[test]
    fn signal_serializes_as_plain_string() {
        let json = serde_json::to_string(&Signal::new("INFO: hi")).unwrap();
        assert_eq!(json, "\"INFO: hi\"");
    }
}
