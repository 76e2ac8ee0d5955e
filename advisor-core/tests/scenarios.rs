//! End-to-end scenarios: fetch layer → indicators → decision.

use std::sync::Arc;

use chrono::NaiveDate;

use advisor_core::config::FetchConfig;
use advisor_core::data::{
    CsvProvider, DataError, DataProvider, DataSource, FetchResult, Period, PriceSource, RawBar,
    StockFetcher,
};
use advisor_core::decision::analyze;
use advisor_core::domain::{PriceBar, Verdict};
use advisor_core::indicators::add_all_indicators;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn quick_fetch_config() -> FetchConfig {
    FetchConfig {
        retry_delay_ms: 0,
        refresh_tail_days: 0,
        ..FetchConfig::default()
    }
}

/// Serves `rows` for `symbol` only.
struct Fixed {
    symbol: &'static str,
    rows: Vec<RawBar>,
}

impl DataProvider for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn fetch(&self, symbol: &str, _start: NaiveDate, _end: NaiveDate) -> Result<FetchResult, DataError> {
        if symbol != self.symbol {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars: self.rows.clone(),
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[test]
fn rising_series_with_volume_spike_is_buy() {
    // 24-day pullback, then a 6-day recovery whose last bar lifts SMA(5) over SMA(20)
    let start = d(2024, 1, 1);
    let closes: Vec<f64> = (0..24)
        .map(|i| 130.0 - i as f64)
        .chain((1..=6).map(|k| 107.0 + 2.0 * k as f64))
        .collect();
    let bars: Vec<PriceBar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close - 0.5,
            high: close + 0.5,
            low: close - 1.0,
            close,
            volume: if i == 29 { 5_000 } else { 1_000 + 10 * i as u64 },
        })
        .collect();

    let frame = add_all_indicators(&bars).unwrap();
    let (today, yesterday) = (&frame.rows[29], &frame.rows[28]);
    assert!(yesterday.sma_5 <= yesterday.sma_20);
    assert!(today.sma_5 > today.sma_20);

    let decision = analyze(&frame.rows);
    assert_eq!(decision.decision, Verdict::Buy);
    assert!(decision.confidence >= 70, "confidence {}", decision.confidence);
    let texts: Vec<&str> = decision.signals.iter().map(|s| s.text()).collect();
    assert!(texts.contains(&"BULLISH: SMA(5) crossed above SMA(20) with high volume"));
    assert!(texts
        .iter()
        .any(|t| t.starts_with("BULLISH: Price > SMA(5) > SMA(20)")));
}

#[test]
fn flat_series_is_neutral_hold() {
    let start = d(2024, 1, 1);
    let bars: Vec<PriceBar> = (0..40)
        .map(|i| PriceBar {
            date: start + chrono::Duration::days(i),
            open: 250.0,
            high: 250.0,
            low: 250.0,
            close: 250.0,
            volume: 10_000,
        })
        .collect();

    let frame = add_all_indicators(&bars).unwrap();
    for row in &frame.rows[26..] {
        assert_eq!(row.rsi, 50.0);
        assert_eq!(row.macd, 0.0);
        assert_eq!(row.macd_signal, 0.0);
        assert_eq!(row.macd_hist, 0.0);
    }
    let decision = analyze(&frame.rows);
    assert_eq!(decision.decision, Verdict::Hold);
    assert_eq!(decision.confidence, 50);
}

#[test]
fn ten_rows_is_data_unavailable() {
    let rows = (0..10)
        .map(|i| RawBar::complete(d(2024, 5, 1 + i), 10.0, 11.0, 9.0, 10.5, 1_000))
        .collect();
    let fetcher = StockFetcher::new(
        Arc::new(Fixed {
            symbol: "LUCK.KA",
            rows,
        }),
        quick_fetch_config(),
    )
    .with_reference_date(d(2024, 5, 31));

    let err = fetcher.fetch("LUCK", Period::OneMonth).unwrap_err();
    assert_eq!(
        err,
        DataError::DataUnavailable("Insufficient data (only 10 rows, need at least 20)".into())
    );
}

#[test]
fn csv_directory_feeds_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = String::from("date,open,high,low,close,volume\n");
    let start = d(2024, 1, 1);
    let mut written = 0;
    for i in 0..60 {
        let date = start + chrono::Duration::days(i);
        let close = 50.0 + (i as f64 * 0.3).sin() * 5.0;
        // one gap in the close column, filled by the fetch layer
        let close_cell = if i == 30 {
            String::new()
        } else {
            format!("{close:.2}")
        };
        csv.push_str(&format!(
            "{date},{:.2},{:.2},{:.2},{close_cell},{}\n",
            close - 0.2,
            close + 0.5,
            close - 0.5,
            20_000 + i * 100
        ));
        written += 1;
    }
    std::fs::write(dir.path().join("HBL.csv"), csv).unwrap();

    let fetcher = StockFetcher::new(Arc::new(CsvProvider::new(dir.path())), quick_fetch_config())
        .with_reference_date(d(2024, 3, 31));
    let history = fetcher.fetch("hbl.ka", Period::ThreeMonths).unwrap();

    assert_eq!(history.ticker, "HBL");
    // suffixed names have no file, so the bare symbol resolves
    assert_eq!(history.symbol, "HBL");
    assert_eq!(history.source, DataSource::CsvImport);
    assert_eq!(history.bars.len(), written);
    assert_eq!(history.bars[30].close, history.bars[29].close);

    let frame = add_all_indicators(&history.bars).unwrap();
    let decision = analyze(&frame.rows);
    assert!((50..=95).contains(&decision.confidence));
}
