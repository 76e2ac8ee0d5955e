//! Market news headlines.
//!
//! News is general market coverage: a ticker keyword is accepted for interface
//! compatibility but does not narrow the results.

pub mod rss_feed;

pub use rss_feed::RssNewsFeed;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Feed-supplied publication date, or "Recent" when absent.
    pub published: String,
    pub summary: String,
    pub source: String,
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("failed to fetch feed {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to parse feed {url}: {message}")]
    Parse { url: String, message: String },
}

pub trait NewsProvider: Send + Sync {
    fn fetch(&self, keyword: Option<&str>, limit: usize) -> Result<Vec<NewsItem>, NewsError>;
}
