//! Price source selection for the runner.
//!
//! Resolves which provider backs the fetch layer:
//! 1. `--csv-dir` → CSV files on disk, one `<SYMBOL>.csv` per ticker
//! 2. `--synthetic` → deterministic generated bars (tagged `synthetic`)
//! 3. Otherwise → Yahoo Finance behind a shared circuit breaker
//!
//! Offline sources are deterministic, so the fetch layer gets a single
//! attempt and no refresh pull for them.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use advisor_core::config::FetchConfig;
use advisor_core::data::{
    CircuitBreaker, CsvProvider, DataError, DataProvider, StockFetcher, SyntheticProvider,
    YahooProvider,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV directory does not exist: {}", .0.display())]
    CsvDirMissing(PathBuf),

    #[error("--synthetic and --csv-dir are mutually exclusive")]
    ConflictingSources,

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub synthetic: bool,
    pub csv_dir: Option<PathBuf>,
}

/// Build the fetch layer for the selected provider.
pub fn build_price_source(
    opts: &LoadOptions,
    fetch: &FetchConfig,
) -> Result<Arc<StockFetcher>, LoadError> {
    let (provider, offline): (Arc<dyn DataProvider>, bool) = match (&opts.csv_dir, opts.synthetic)
    {
        (Some(_), true) => return Err(LoadError::ConflictingSources),
        (Some(dir), false) => {
            if !dir.is_dir() {
                return Err(LoadError::CsvDirMissing(dir.clone()));
            }
            (Arc::new(CsvProvider::new(dir.clone())), true)
        }
        (None, true) => (Arc::new(SyntheticProvider::new()), true),
        (None, false) => {
            let breaker = Arc::new(CircuitBreaker::default_provider());
            (Arc::new(YahooProvider::new(breaker)?), false)
        }
    };

    let mut config = fetch.clone();
    if offline {
        config.max_retries = 1;
        config.refresh_tail_days = 0;
    }
    tracing::debug!(
        provider = provider.name(),
        retries = config.max_retries,
        "price source ready"
    );
    Ok(Arc::new(StockFetcher::new(provider, config)))
}
