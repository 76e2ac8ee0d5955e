//! Portfolio Allocator: turns the universe's BUY signals into a share plan.
//!
//! Validation happens before any fetch. The allocation itself is a pure
//! function of the collected opportunities, so it is tested without a
//! network or a thread pool.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use advisor_core::config::{AllocationMode, PortfolioConfig};
use advisor_core::domain::{Signal, Verdict};

use crate::analysis::TickerAnalysis;
use crate::scanner::MarketScanner;
use crate::weighting::Weighting;

/// Label reported for the equal split across every BUY ticker.
pub const EQUAL_ALL_STRATEGY: &str = "equal_across_all_buy_signals";

pub const NO_OPPORTUNITIES_MESSAGE: &str =
    "No BUY opportunities found right now. Market might be bearish.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }

    /// How many of the strongest BUY tickers this tier holds.
    pub fn max_stocks(&self) -> usize {
        match self {
            Self::Conservative => 5,
            Self::Moderate => 4,
            Self::Aggressive => 3,
        }
    }

    pub fn weighting(&self) -> Weighting {
        match self {
            Self::Conservative => Weighting::Equal,
            Self::Moderate => Weighting::ConfidenceWeighted,
            Self::Aggressive => Weighting::TopHeavy,
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "moderate" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(PortfolioError::InvalidRiskLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    #[error("Budget must be at least PKR {}", thousands(.minimum))]
    BudgetTooLow { budget: f64, minimum: f64 },

    #[error("Invalid risk level. Must be conservative, moderate, or aggressive")]
    InvalidRiskLevel(String),
}

/// A ticker whose latest decision is BUY.
#[derive(Debug, Clone, PartialEq)]
pub struct Opportunity {
    pub ticker: String,
    pub price: f64,
    pub confidence: u8,
    pub rsi: f64,
    pub macd: f64,
    pub signals: Vec<Signal>,
}

impl Opportunity {
    /// `None` unless the analysis ended in a BUY.
    pub fn from_analysis(ticker: &str, result: &TickerAnalysis) -> Option<Self> {
        if result.decision.decision != Verdict::Buy {
            return None;
        }
        let latest = result.latest();
        Some(Self {
            ticker: ticker.to_string(),
            price: latest.close(),
            confidence: result.decision.confidence,
            rsi: latest.rsi,
            macd: latest.macd,
            signals: result.decision.signals.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub ticker: String,
    pub price: f64,
    pub shares: u64,
    pub investment: f64,
    pub allocation_percent: f64,
    pub confidence: u8,
    pub rsi: f64,
    pub macd: f64,
    pub signals: Vec<Signal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_budget: f64,
    pub total_invested: f64,
    pub cash_remaining: f64,
    pub num_stocks: usize,
    pub percent_invested: f64,
    pub risk_level: RiskTier,
    pub allocation_strategy: String,
}

/// An empty outcome is still a valid portfolio: `success` is false and the
/// message explains why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub success: bool,
    pub message: String,
    pub stocks: Vec<PortfolioItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PortfolioSummary>,
}

impl Portfolio {
    fn empty() -> Self {
        Self {
            success: false,
            message: NO_OPPORTUNITIES_MESSAGE.to_string(),
            stocks: Vec::new(),
            summary: None,
        }
    }
}

/// Reject a request before any data is fetched.
pub fn validate_request(
    budget: f64,
    risk_level: &str,
    config: &PortfolioConfig,
) -> Result<RiskTier, PortfolioError> {
    // NaN fails this comparison too
    if !(budget >= config.min_budget) {
        return Err(PortfolioError::BudgetTooLow {
            budget,
            minimum: config.min_budget,
        });
    }
    risk_level.parse()
}

/// Split `budget` across `opportunities` and buy whole shares.
///
/// Opportunities are ranked by confidence (ties by ticker). Any ticker whose
/// allocation cannot buy a single share is dropped, and its money stays as
/// cash.
pub fn allocate(
    mut opportunities: Vec<Opportunity>,
    budget: f64,
    tier: RiskTier,
    mode: AllocationMode,
) -> Portfolio {
    opportunities.retain(|o| o.price > 0.0 && o.price.is_finite());
    if opportunities.is_empty() {
        return Portfolio::empty();
    }
    opportunities.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });

    let (selected, weighting, strategy) = match mode {
        AllocationMode::EqualAll => (
            opportunities,
            Weighting::Equal,
            EQUAL_ALL_STRATEGY.to_string(),
        ),
        AllocationMode::RiskTier => {
            let mut top = opportunities;
            top.truncate(tier.max_stocks());
            let weighting = tier.weighting();
            (top, weighting, weighting.as_str().to_string())
        }
    };

    let confidences: Vec<u8> = selected.iter().map(|o| o.confidence).collect();
    let weights = weighting.weights(&confidences);

    let mut stocks = Vec::with_capacity(selected.len());
    for (opp, weight) in selected.into_iter().zip(weights) {
        let allocation = budget * weight;
        let shares = (allocation / opp.price).floor() as u64;
        if shares == 0 {
            tracing::debug!(ticker = %opp.ticker, price = opp.price, allocation, "allocation below one share");
            continue;
        }
        let investment = shares as f64 * opp.price;
        stocks.push(PortfolioItem {
            ticker: opp.ticker,
            price: opp.price,
            shares,
            investment,
            allocation_percent: investment / budget * 100.0,
            confidence: opp.confidence,
            rsi: opp.rsi,
            macd: opp.macd,
            signals: opp.signals,
        });
    }

    let total_invested: f64 = stocks.iter().map(|s| s.investment).sum();
    let summary = PortfolioSummary {
        total_budget: budget,
        total_invested,
        cash_remaining: budget - total_invested,
        num_stocks: stocks.len(),
        percent_invested: total_invested / budget * 100.0,
        risk_level: tier,
        allocation_strategy: strategy,
    };
    let message = match mode {
        AllocationMode::EqualAll => format!(
            "Successfully generated portfolio with {} stocks (ALL BUY signals)",
            stocks.len()
        ),
        AllocationMode::RiskTier => format!(
            "Successfully generated {tier} portfolio with {} stocks",
            stocks.len()
        ),
    };

    Portfolio {
        success: true,
        message,
        stocks,
        summary: Some(summary),
    }
}

/// Validate, scan the universe, and allocate across every BUY signal.
pub fn generate_portfolio(
    scanner: &MarketScanner,
    tickers: &[String],
    budget: f64,
    risk_level: &str,
    config: &PortfolioConfig,
) -> Result<Portfolio, PortfolioError> {
    let tier = validate_request(budget, risk_level, config)?;

    let opportunities: Vec<Opportunity> = scanner
        .analyze_all(tickers, config.period)
        .iter()
        .filter_map(|(ticker, result)| Opportunity::from_analysis(ticker, result))
        .collect();

    let portfolio = allocate(opportunities, budget, tier, config.allocation);
    tracing::info!(
        budget,
        risk = %tier,
        mode = ?config.allocation,
        stocks = portfolio.stocks.len(),
        invested = portfolio.summary.as_ref().map_or(0.0, |s| s.total_invested),
        "portfolio generated"
    );
    Ok(portfolio)
}

/// `1000.0` → `"1,000"`; fractional amounts keep two decimals.
fn thousands(amount: &f64) -> String {
    let amount = *amount;
    let whole = amount.trunc() as i64;
    let digits = whole.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if whole < 0 {
        out.insert(0, '-');
    }
    let frac = amount.fract().abs();
    if frac > 0.0 {
        out.push_str(&format!("{frac:.2}")[1..]);
    }
    out
}
