//! Criterion benchmarks for the advisor hot paths.
//!
//! Benchmarks:
//! 1. Individual indicators (SMA, EMA, RSI, MACD) over a 5-year series
//! 2. Full indicator frame (all series + fill chain + row assembly)
//! 3. Decision rules over a prepared frame

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use advisor_core::decision::analyze;
use advisor_core::domain::PriceBar;
use advisor_core::indicators::{add_all_indicators, Ema, Indicator, Macd, Rsi, Sma};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            PriceBar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let bars = make_bars(1260);
    let mut group = c.benchmark_group("indicators");

    let sma = Sma::new(20);
    let ema = Ema::new(26);
    let rsi = Rsi::new(14);
    let macd = Macd::signal();
    let indicators: [(&str, &dyn Indicator); 4] = [
        ("sma_20", &sma),
        ("ema_26", &ema),
        ("rsi_14", &rsi),
        ("macd_signal", &macd),
    ];
    for (name, indicator) in indicators {
        group.bench_function(name, |b| b.iter(|| indicator.compute(black_box(&bars))));
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_frame");
    for bar_count in [66, 252, 1260] {
        let bars = make_bars(bar_count);
        group.bench_with_input(BenchmarkId::new("add_all", bar_count), &bars, |b, bars| {
            b.iter(|| add_all_indicators(black_box(bars)))
        });
    }
    group.finish();
}

fn bench_decision(c: &mut Criterion) {
    let frame = add_all_indicators(&make_bars(252)).unwrap();
    c.bench_function("decision_rules_252", |b| {
        b.iter(|| analyze(black_box(&frame.rows)))
    });
}

criterion_group!(benches, bench_indicators, bench_frame, bench_decision);
criterion_main!(benches);
