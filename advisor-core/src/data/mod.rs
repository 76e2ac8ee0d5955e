//! Price data: providers, validation, and the fetch layer.

pub mod circuit_breaker;
pub mod csv_import;
pub mod fetcher;
pub mod period;
pub mod provider;
pub mod synthetic;
pub mod universe;
pub mod validate;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_import::CsvProvider;
pub use fetcher::{PriceHistory, PriceSource, StockFetcher};
pub use period::Period;
pub use provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
pub use synthetic::SyntheticProvider;
pub use universe::{base_ticker, Universe, DEFAULT_PSX_TICKERS};
pub use validate::{clean, insane_dates, validate, ValidationRules};
pub use yahoo::YahooProvider;
