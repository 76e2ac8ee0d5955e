//! Portfolio Allocator: worked example, request validation, and budget invariants.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;

use advisor_core::config::{AllocationMode, PortfolioConfig};
use advisor_core::data::{DataError, DataSource, Period, PriceHistory, PriceSource};
use advisor_core::domain::PriceBar;
use advisor_runner::{
    allocate, generate_portfolio, MarketScanner, Opportunity, PortfolioError, RiskTier,
};

fn opp(ticker: &str, price: f64, confidence: u8) -> Opportunity {
    Opportunity {
        ticker: ticker.to_string(),
        price,
        confidence,
        rsi: 45.0,
        macd: 0.1,
        signals: Vec::new(),
    }
}

// ── Worked example ───────────────────────────────────────────────────

#[test]
fn equal_split_of_300_across_two_buys() {
    let p = allocate(
        vec![opp("A", 100.0, 70), opp("B", 50.0, 90)],
        300.0,
        RiskTier::Moderate,
        AllocationMode::EqualAll,
    );
    assert!(p.success);

    let a = p.stocks.iter().find(|s| s.ticker == "A").unwrap();
    let b = p.stocks.iter().find(|s| s.ticker == "B").unwrap();
    assert_eq!((a.shares, a.investment), (1, 100.0));
    assert_eq!((b.shares, b.investment), (3, 150.0));

    let summary = p.summary.unwrap();
    assert_eq!(summary.total_invested, 250.0);
    assert_eq!(summary.cash_remaining, 50.0);
    assert_eq!(summary.num_stocks, 2);
    assert!((summary.percent_invested - 250.0 / 3.0).abs() < 1e-9);
}

#[test]
fn risk_tier_mode_uses_tier_weighting() {
    let opps = vec![
        opp("A", 10.0, 90),
        opp("B", 10.0, 80),
        opp("C", 10.0, 70),
        opp("D", 10.0, 65),
        opp("E", 10.0, 60),
    ];
    let p = allocate(opps, 10_000.0, RiskTier::Moderate, AllocationMode::RiskTier);
    assert_eq!(p.stocks.len(), 4);
    assert!(p.stocks.iter().all(|s| s.ticker != "E"));
    // 90 / (90 + 80 + 70 + 65) of the budget
    assert_eq!(p.stocks[0].shares, (10_000.0 * 90.0 / 305.0 / 10.0_f64).floor() as u64);
    assert_eq!(p.summary.unwrap().allocation_strategy, "confidence_weighted");
}

// ── generate_portfolio ───────────────────────────────────────────────

struct Counting {
    calls: AtomicUsize,
}

impl PriceSource for Counting {
    fn fetch(&self, ticker: &str, _period: Period) -> Result<PriceHistory, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<PriceBar> = (0..30)
            .map(|i| {
                let close = if ticker == "RISE" {
                    100.0 + i as f64
                } else {
                    60.0
                };
                PriceBar {
                    date: start + chrono::Duration::days(i),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: if i == 29 { 8_000 } else { 2_000 },
                }
            })
            .collect();
        Ok(PriceHistory {
            ticker: ticker.to_string(),
            symbol: format!("{ticker}.KA"),
            bars,
            source: DataSource::Synthetic,
        })
    }
}

fn scanner() -> (Arc<Counting>, MarketScanner) {
    let source = Arc::new(Counting {
        calls: AtomicUsize::new(0),
    });
    (source.clone(), MarketScanner::new(source, 4, 22))
}

#[test]
fn invalid_requests_are_rejected_before_fetching() {
    let (source, scanner) = scanner();
    let tickers = vec!["RISE".to_string()];
    let config = PortfolioConfig::default();

    let err = generate_portfolio(&scanner, &tickers, 999.0, "moderate", &config).unwrap_err();
    assert!(matches!(err, PortfolioError::BudgetTooLow { .. }));
    assert_eq!(err.to_string(), "Budget must be at least PKR 1,000");

    let err = generate_portfolio(&scanner, &tickers, 5_000.0, "reckless", &config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid risk level. Must be conservative, moderate, or aggressive"
    );
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn only_buy_signals_are_allocated() {
    let (_, scanner) = scanner();
    let tickers = vec!["RISE".to_string(), "FLAT".to_string()];
    let p = generate_portfolio(
        &scanner,
        &tickers,
        1_000.0,
        "aggressive",
        &PortfolioConfig::default(),
    )
    .unwrap();

    assert!(p.success);
    assert_eq!(p.stocks.len(), 1);
    assert_eq!(p.stocks[0].ticker, "RISE");
    // 1000 / 129 → 7 shares
    assert_eq!(p.stocks[0].shares, 7);
    assert!(!p.stocks[0].signals.is_empty());
    let summary = p.summary.unwrap();
    assert_eq!(summary.risk_level, RiskTier::Aggressive);
    assert_eq!(summary.allocation_strategy, "equal_across_all_buy_signals");
}

#[test]
fn no_buys_is_an_unsuccessful_empty_portfolio() {
    let (_, scanner) = scanner();
    let tickers = vec!["FLAT".to_string()];
    let p = generate_portfolio(
        &scanner,
        &tickers,
        50_000.0,
        "conservative",
        &PortfolioConfig::default(),
    )
    .unwrap();
    assert!(!p.success);
    assert!(p.stocks.is_empty());
    assert_eq!(
        p.message,
        "No BUY opportunities found right now. Market might be bearish."
    );
}

// ── Budget invariants ────────────────────────────────────────────────

fn arb_opportunities() -> impl Strategy<Value = Vec<Opportunity>> {
    prop::collection::vec((1.0..2_000.0_f64, 60u8..=95), 1..25).prop_map(|v| {
        v.into_iter()
            .enumerate()
            .map(|(i, (price, conf))| opp(&format!("T{i:02}"), (price * 100.0).round() / 100.0, conf))
            .collect()
    })
}

fn arb_mode() -> impl Strategy<Value = (AllocationMode, RiskTier)> {
    (
        prop_oneof![Just(AllocationMode::EqualAll), Just(AllocationMode::RiskTier)],
        prop_oneof![
            Just(RiskTier::Conservative),
            Just(RiskTier::Moderate),
            Just(RiskTier::Aggressive)
        ],
    )
}

proptest! {
    #[test]
    fn invested_never_exceeds_budget(
        opps in arb_opportunities(),
        budget in 1_000.0..1_000_000.0_f64,
        (mode, tier) in arb_mode(),
    ) {
        let p = allocate(opps, budget, tier, mode);
        let summary = p.summary.expect("non-empty input always yields a summary");
        let invested: f64 = p.stocks.iter().map(|s| s.investment).sum();

        prop_assert!(invested <= budget + 1e-6);
        prop_assert!((summary.total_invested - invested).abs() < 1e-6);
        prop_assert!((summary.cash_remaining - (budget - invested)).abs() < 1e-6);
        prop_assert!(summary.cash_remaining >= -1e-6);
        for s in &p.stocks {
            prop_assert!(s.shares >= 1);
            prop_assert!((s.investment - s.shares as f64 * s.price).abs() < 1e-6);
        }
    }

    #[test]
    fn equal_split_caps_each_position(
        opps in arb_opportunities(),
        budget in 1_000.0..1_000_000.0_f64,
    ) {
        let n = opps.len() as f64;
        let p = allocate(opps, budget, RiskTier::Moderate, AllocationMode::EqualAll);
        for s in &p.stocks {
            prop_assert!(s.investment <= budget / n + 1e-6);
            // one more share would overshoot the equal slice
            prop_assert!(s.investment + s.price > budget / n - 1e-6);
        }
        for pair in p.stocks.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
    }
}
