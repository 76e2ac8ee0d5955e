//! Export of scan and portfolio records — JSON, CSV, and Markdown.
//!
//! - **JSON**: the same stable records the CLI prints with `--json`
//! - **CSV**: one row per scanned ticker or per held stock, for spreadsheets
//! - **Markdown**: a human-readable portfolio plan

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::portfolio::Portfolio;
use crate::scanner::ScanRow;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json<T: Serialize>(record: &T) -> Result<String> {
    serde_json::to_string_pretty(record).context("failed to serialize record to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: ticker, price, change_percent, signal, confidence, rsi, volume
pub fn export_scan_csv(rows: &[ScanRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "price",
        "change_percent",
        "signal",
        "confidence",
        "rsi",
        "volume",
    ])?;

    for r in rows {
        wtr.write_record([
            &r.ticker,
            &format!("{:.2}", r.price),
            &format!("{:.2}", r.change_percent),
            r.signal.as_str(),
            &r.confidence.to_string(),
            &format!("{:.2}", r.rsi),
            &r.volume.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Columns: ticker, price, shares, investment, allocation_percent,
/// confidence, rsi, macd
pub fn export_portfolio_csv(portfolio: &Portfolio) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "price",
        "shares",
        "investment",
        "allocation_percent",
        "confidence",
        "rsi",
        "macd",
    ])?;
    for s in &portfolio.stocks {
        wtr.write_record([
            &s.ticker,
            &format!("{:.2}", s.price),
            &s.shares.to_string(),
            &format!("{:.2}", s.investment),
            &format!("{:.2}", s.allocation_percent),
            &s.confidence.to_string(),
            &format!("{:.2}", s.rsi),
            &format!("{:.4}", s.macd),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `scan.json` and `scan.csv` into a timestamped directory under
/// `output_dir`. Returns the directory.
pub fn save_scan(rows: &[ScanRow], output_dir: &Path) -> Result<PathBuf> {
    let dir = stamped_dir(output_dir, "scan")?;
    std::fs::write(dir.join("scan.json"), export_json(&rows)?)?;
    std::fs::write(dir.join("scan.csv"), export_scan_csv(rows)?)?;
    Ok(dir)
}

/// Write `portfolio.json`, `portfolio.csv` and `portfolio.md`.
pub fn save_portfolio(portfolio: &Portfolio, output_dir: &Path) -> Result<PathBuf> {
    let dir = stamped_dir(output_dir, "portfolio")?;
    std::fs::write(dir.join("portfolio.json"), export_json(portfolio)?)?;
    std::fs::write(dir.join("portfolio.csv"), export_portfolio_csv(portfolio)?)?;
    std::fs::write(dir.join("portfolio.md"), portfolio_report(portfolio))?;
    Ok(dir)
}

fn stamped_dir(output_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let dirname = format!(
        "{prefix}_{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let dir = output_dir.join(dirname);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create export dir: {}", dir.display()))?;
    Ok(dir)
}

// ─── Markdown report ────────────────────────────────────────────────

pub fn portfolio_report(portfolio: &Portfolio) -> String {
    let mut md = String::with_capacity(1024);
    md.push_str("# Portfolio Plan\n\n");
    md.push_str(&format!("{}\n\n", portfolio.message));

    let Some(summary) = &portfolio.summary else {
        return md;
    };

    md.push_str("## Summary\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Budget | PKR {:.2} |\n", summary.total_budget));
    md.push_str(&format!("| Invested | PKR {:.2} |\n", summary.total_invested));
    md.push_str(&format!("| Cash Remaining | PKR {:.2} |\n", summary.cash_remaining));
    md.push_str(&format!("| Percent Invested | {:.2}% |\n", summary.percent_invested));
    md.push_str(&format!("| Risk Level | {} |\n", summary.risk_level));
    md.push_str(&format!("| Strategy | {} |\n", summary.allocation_strategy));
    md.push('\n');

    md.push_str("## Holdings\n\n");
    md.push_str("| Ticker | Price | Shares | Investment | Allocation | Confidence |\n");
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: |\n");
    for s in &portfolio.stocks {
        md.push_str(&format!(
            "| {} | {:.2} | {} | {:.2} | {:.2}% | {}% |\n",
            s.ticker, s.price, s.shares, s.investment, s.allocation_percent, s.confidence
        ));
    }
    md.push('\n');
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{allocate, Opportunity, RiskTier};
    use advisor_core::config::AllocationMode;
    use advisor_core::domain::Verdict;

    fn sample_rows() -> Vec<ScanRow> {
        vec![
            ScanRow {
                ticker: "HBL".into(),
                price: 101.256,
                change_percent: 4.5,
                signal: Verdict::Buy,
                confidence: 75,
                rsi: 41.2,
                volume: 120_000,
            },
            ScanRow {
                ticker: "PSO".into(),
                price: 350.0,
                change_percent: -2.25,
                signal: Verdict::Sell,
                confidence: 70,
                rsi: 68.0,
                volume: 80_000,
            },
        ]
    }

    fn sample_portfolio() -> Portfolio {
        let opps = vec![
            Opportunity {
                ticker: "A".into(),
                price: 100.0,
                confidence: 70,
                rsi: 40.0,
                macd: 0.3,
                signals: Vec::new(),
            },
            Opportunity {
                ticker: "B".into(),
                price: 50.0,
                confidence: 90,
                rsi: 33.0,
                macd: 0.8,
                signals: Vec::new(),
            },
        ];
        allocate(opps, 300.0, RiskTier::Moderate, AllocationMode::EqualAll)
    }

    #[test]
    fn scan_csv_columns_and_rows() {
        let csv = export_scan_csv(&sample_rows()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "ticker,price,change_percent,signal,confidence,rsi,volume"
        );
        assert_eq!(lines[1], "HBL,101.26,4.50,BUY,75,41.20,120000");
        assert!(lines[2].starts_with("PSO,350.00,-2.25,SELL"));
    }

    #[test]
    fn empty_scan_is_header_only() {
        let csv = export_scan_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn portfolio_csv_and_report() {
        let p = sample_portfolio();
        let csv = export_portfolio_csv(&p).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.contains("B,50.00,3,150.00,50.00,90"));

        let md = portfolio_report(&p);
        assert!(md.contains("## Holdings"));
        assert!(md.contains("| Cash Remaining | PKR 50.00 |"));
    }

    #[test]
    fn empty_portfolio_report_has_no_tables() {
        let p = allocate(Vec::new(), 1000.0, RiskTier::Moderate, AllocationMode::EqualAll);
        let md = portfolio_report(&p);
        assert!(md.contains("No BUY opportunities"));
        assert!(!md.contains("## Holdings"));
    }

    #[test]
    fn save_bundles_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let scan_dir = save_scan(&sample_rows(), dir.path()).unwrap();
        assert!(scan_dir.join("scan.json").exists());
        assert!(scan_dir.join("scan.csv").exists());

        let json = std::fs::read_to_string(scan_dir.join("scan.json")).unwrap();
        let back: Vec<ScanRow> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample_rows());

        let p_dir = save_portfolio(&sample_portfolio(), dir.path()).unwrap();
        assert!(p_dir.join("portfolio.md").exists());
    }
}
