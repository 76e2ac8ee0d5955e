//! Advisor CLI — technical-analysis advice for PSX stocks.
//!
//! Commands:
//! - `analyze` — full analysis of one ticker (indicators, signals, verdict)
//! - `scan` — verdicts across the ticker universe, optionally BUY/SELL only
//! - `portfolio` — share plan for a budget across current BUY signals
//! - `news` — general market headlines
//! - `universe` — list the tickers scanned by default
//! - `config show|init` — print or write the effective configuration

mod logging;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use advisor_core::config::{AdvisorConfig, AllocationMode};
use advisor_core::data::{Period, Universe};
use advisor_core::domain::SignalTone;
use advisor_core::news::{NewsProvider, RssNewsFeed};
use advisor_runner::export::{save_portfolio, save_scan};
use advisor_runner::{
    analyze_stock, build_price_source, generate_portfolio, Envelope, LoadOptions, MarketScanner,
    NewsPayload, Portfolio, ScanFilter, ScanPayload, StockAnalysis, UniversePayload,
};

#[derive(Parser)]
#[command(
    name = "advisor",
    about = "Advisor CLI — rule-based BUY/SELL/HOLD advice for PSX stocks"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print structured JSON records instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log format: text or json.
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    /// Use deterministic synthetic prices instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    /// Read prices from `<TICKER>.csv` files in this directory.
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    /// TOML file with a `tickers = [...]` list overriding the configured universe.
    #[arg(long, global = true)]
    universe: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one ticker.
    Analyze {
        /// Ticker symbol (e.g. HBL, OGDC.KA).
        ticker: String,

        /// Display period: 1mo, 3mo, 6mo, 1y, 2y, 5y.
        #[arg(long, default_value = "1y")]
        period: Period,

        /// Include the per-bar chart rows in JSON output.
        #[arg(long, default_value_t = false)]
        chart: bool,
    },
    /// Scan the universe for signals.
    Scan {
        /// all, buy, or sell.
        #[arg(long, default_value = "all")]
        filter: ScanFilter,

        /// Overrides `[scan] period`.
        #[arg(long)]
        period: Option<Period>,

        /// Overrides `[scan] max_workers`.
        #[arg(long)]
        workers: Option<usize>,

        /// Write scan.json and scan.csv into a timestamped directory here.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Build a share plan for a budget (PKR).
    Portfolio {
        /// Budget in PKR.
        #[arg(long)]
        budget: f64,

        /// conservative, moderate, or aggressive.
        #[arg(long, default_value = "moderate")]
        risk: String,

        /// Overrides `[portfolio] allocation`: equal_all or risk_tier.
        #[arg(long)]
        allocation: Option<String>,

        /// Overrides `[scan] max_workers`.
        #[arg(long)]
        workers: Option<usize>,

        /// Write portfolio.json/.csv/.md into a timestamped directory here.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// General market news.
    News {
        /// Accepted for compatibility; results are general market news.
        #[arg(long)]
        ticker: Option<String>,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List the ticker universe.
    Universe,
    /// Configuration helpers.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Write the default configuration to a file.
    Init {
        #[arg(default_value = "advisor.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, &cli.log_format);

    let config = match &cli.config {
        Some(path) => AdvisorConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AdvisorConfig::default(),
    };
    tracing::debug!(fingerprint = %config.fingerprint(), "configuration loaded");

    match &cli.command {
        Commands::Analyze {
            ticker,
            period,
            chart,
        } => run_analyze(&cli, &config, ticker, *period, *chart),
        Commands::Scan {
            filter,
            period,
            workers,
            export,
        } => run_scan(&cli, &config, *filter, *period, *workers, export.as_deref()),
        Commands::Portfolio {
            budget,
            risk,
            allocation,
            workers,
            export,
        } => run_portfolio(
            &cli,
            &config,
            *budget,
            risk,
            allocation.as_deref(),
            *workers,
            export.as_deref(),
        ),
        Commands::News { ticker, limit } => run_news(&cli, &config, ticker.as_deref(), *limit),
        Commands::Universe => run_universe(&cli, &config),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(&config),
            ConfigAction::Init { path, force } => run_config_init(path, *force),
        },
    }
}

fn load_options(cli: &Cli) -> LoadOptions {
    LoadOptions {
        synthetic: cli.synthetic,
        csv_dir: cli.csv_dir.clone(),
    }
}

fn universe(cli: &Cli, config: &AdvisorConfig) -> Result<Universe> {
    match &cli.universe {
        Some(path) => Ok(Universe::from_file(path)?),
        None => Ok(Universe::new(&config.universe)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

// ─── analyze ────────────────────────────────────────────────────────

fn run_analyze(
    cli: &Cli,
    config: &AdvisorConfig,
    ticker: &str,
    period: Period,
    chart: bool,
) -> Result<()> {
    let source = build_price_source(&load_options(cli), &config.fetch)?;

    match analyze_stock(source.as_ref(), ticker, period) {
        Ok(mut analysis) => {
            if cli.json {
                if !chart {
                    analysis.chart_data.clear();
                }
                print_json(&Envelope::ok(analysis))
            } else {
                print_analysis(&analysis);
                Ok(())
            }
        }
        Err(e) => {
            if cli.json {
                print_json(&Envelope::<StockAnalysis>::failure(e.to_string()))?;
            } else {
                eprintln!("Error analyzing {ticker}: {e}");
                eprintln!("Hint: {}", e.remediation());
            }
            std::process::exit(1);
        }
    }
}

fn print_analysis(a: &StockAnalysis) {
    println!();
    println!("=== {} ({}) ===", a.ticker, a.resolved_symbol);
    println!("Date:           {}", a.latest_date);
    println!(
        "Decision:       {} ({}% confidence)",
        a.analysis.decision, a.analysis.confidence
    );
    println!();
    println!("--- Price ({}) ---", a.period);
    println!("Current:        {:.2}", a.price.current);
    println!(
        "Change:         {:+.2} ({:+.2}%)",
        a.price.change, a.price.change_percent
    );
    println!("High / Low:     {:.2} / {:.2}", a.price.high, a.price.low);
    println!("Volume:         {}", a.price.volume);
    if let Some(levels) = &a.levels {
        println!(
            "Support / Res.: {:.2} / {:.2}",
            levels.support, levels.resistance
        );
    }
    println!();
    println!("--- Indicators ---");
    let i = &a.indicators;
    println!("SMA(5) / SMA(20):   {:.2} / {:.2}", i.sma_5, i.sma_20);
    println!("EMA(12) / EMA(26):  {:.2} / {:.2}", i.ema_12, i.ema_26);
    println!("RSI(14):            {:.2}", i.rsi);
    println!("MACD / Signal:      {:.4} / {:.4}", i.macd, i.macd_signal);
    println!();
    println!("--- Signals ---");
    if a.analysis.signals.is_empty() {
        println!("(none)");
    }
    for signal in &a.analysis.signals {
        let marker = match signal.tone() {
            SignalTone::Bullish => "+",
            SignalTone::Bearish => "-",
            SignalTone::Neutral => "·",
        };
        println!("{marker} {}", signal.text());
    }
    if !a.warmup_defaults.is_empty() {
        println!();
        println!(
            "WARNING: not enough history for {}; neutral defaults used",
            a.warmup_defaults.join(", ")
        );
    }
    println!();
}

// ─── scan ───────────────────────────────────────────────────────────

fn run_scan(
    cli: &Cli,
    config: &AdvisorConfig,
    filter: ScanFilter,
    period: Option<Period>,
    workers: Option<usize>,
    export: Option<&Path>,
) -> Result<()> {
    let source = build_price_source(&load_options(cli), &config.fetch)?;
    let universe = universe(cli, config)?;
    let scanner = MarketScanner::new(
        source,
        workers.unwrap_or(config.scan.max_workers),
        config.scan.change_lookback_bars,
    );
    let report = scanner.scan(
        &universe.tickers,
        period.unwrap_or(config.scan.period),
        filter,
    );

    if let Some(dir) = export {
        let out = save_scan(&report.results, dir)?;
        eprintln!("Scan exported to: {}", out.display());
    }

    if cli.json {
        return print_json(&Envelope::ok(ScanPayload {
            count: report.count,
            results: report.results,
        }));
    }

    println!();
    println!(
        "{:<8} {:>10} {:>9} {:<6} {:>5} {:>7} {:>12}",
        "Ticker", "Price", "Change", "Signal", "Conf", "RSI", "Volume"
    );
    println!("{}", "-".repeat(63));
    for r in &report.results {
        println!(
            "{:<8} {:>10.2} {:>8.2}% {:<6} {:>4}% {:>7.2} {:>12}",
            r.ticker, r.price, r.change_percent, r.signal, r.confidence, r.rsi, r.volume
        );
    }
    println!();
    println!(
        "{} result(s) from {} ticker(s); {} skipped",
        report.count,
        universe.len(),
        report.skipped
    );
    Ok(())
}

// ─── portfolio ──────────────────────────────────────────────────────

fn run_portfolio(
    cli: &Cli,
    config: &AdvisorConfig,
    budget: f64,
    risk: &str,
    allocation: Option<&str>,
    workers: Option<usize>,
    export: Option<&Path>,
) -> Result<()> {
    let mut portfolio_config = config.portfolio.clone();
    if let Some(mode) = allocation {
        portfolio_config.allocation = match mode {
            "equal_all" => AllocationMode::EqualAll,
            "risk_tier" => AllocationMode::RiskTier,
            other => bail!("unknown allocation '{other}'. Valid: equal_all, risk_tier"),
        };
    }

    let source = build_price_source(&load_options(cli), &config.fetch)?;
    let universe = universe(cli, config)?;
    let scanner = MarketScanner::new(
        source,
        workers.unwrap_or(config.scan.max_workers),
        config.scan.change_lookback_bars,
    );

    let portfolio = match generate_portfolio(
        &scanner,
        &universe.tickers,
        budget,
        risk,
        &portfolio_config,
    ) {
        Ok(p) => p,
        Err(e) => {
            if cli.json {
                print_json(&Envelope::<Portfolio>::failure(e.to_string()))?;
            } else {
                eprintln!("Error: {e}");
            }
            std::process::exit(1);
        }
    };

    if let Some(dir) = export {
        let out = save_portfolio(&portfolio, dir)?;
        eprintln!("Portfolio exported to: {}", out.display());
    }

    if cli.json {
        return print_json(&portfolio);
    }
    print_portfolio(&portfolio);
    Ok(())
}

fn print_portfolio(p: &Portfolio) {
    println!();
    println!("{}", p.message);
    let Some(summary) = &p.summary else {
        println!();
        return;
    };
    println!();
    println!(
        "{:<8} {:>10} {:>8} {:>12} {:>7} {:>5}",
        "Ticker", "Price", "Shares", "Investment", "Alloc", "Conf"
    );
    println!("{}", "-".repeat(55));
    for s in &p.stocks {
        println!(
            "{:<8} {:>10.2} {:>8} {:>12.2} {:>6.2}% {:>4}%",
            s.ticker, s.price, s.shares, s.investment, s.allocation_percent, s.confidence
        );
    }
    println!();
    println!("Budget:         PKR {:.2}", summary.total_budget);
    println!("Invested:       PKR {:.2}", summary.total_invested);
    println!("Cash remaining: PKR {:.2}", summary.cash_remaining);
    println!("Invested:       {:.2}%", summary.percent_invested);
    println!(
        "Risk / Strategy: {} / {}",
        summary.risk_level, summary.allocation_strategy
    );
    println!();
}

// ─── news / universe / config ───────────────────────────────────────

fn run_news(cli: &Cli, config: &AdvisorConfig, ticker: Option<&str>, limit: usize) -> Result<()> {
    let feed = RssNewsFeed::new(config.news.clone())?;
    match feed.fetch(ticker, limit) {
        Ok(news) => {
            if cli.json {
                return print_json(&Envelope::ok(NewsPayload {
                    count: news.len(),
                    news,
                }));
            }
            if news.is_empty() {
                println!("No market news right now.");
            }
            for item in &news {
                println!("{} — {}", item.published, item.title);
                println!("  {}", item.summary);
                println!("  {}", item.link);
                println!();
            }
            Ok(())
        }
        Err(e) => {
            if cli.json {
                print_json(&Envelope::<NewsPayload>::failure(e.to_string()))?;
            } else {
                eprintln!("Error fetching news: {e}");
            }
            std::process::exit(1);
        }
    }
}

fn run_universe(cli: &Cli, config: &AdvisorConfig) -> Result<()> {
    let universe = universe(cli, config)?;
    if cli.json {
        return print_json(&Envelope::ok(UniversePayload {
            count: universe.len(),
            stocks: universe.tickers,
        }));
    }
    for ticker in universe.iter() {
        println!("{ticker}");
    }
    println!();
    println!("{} ticker(s)", universe.len());
    Ok(())
}

fn run_config_show(config: &AdvisorConfig) -> Result<()> {
    println!("# fingerprint: {}", config.fingerprint());
    print!("{}", config.to_toml()?);
    Ok(())
}

fn run_config_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }
    let toml = AdvisorConfig::default().to_toml()?;
    std::fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
