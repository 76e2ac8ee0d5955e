//! RSS-backed market news.

use std::time::Duration;

use super::{NewsError, NewsItem, NewsProvider};
use crate::config::NewsConfig;

pub struct RssNewsFeed {
    client: reqwest::blocking::Client,
    config: NewsConfig,
}

impl RssNewsFeed {
    pub fn new(config: NewsConfig) -> Result<Self, NewsError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| NewsError::Fetch {
                url: String::new(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn download(&self, url: &str) -> Result<rss::Channel, NewsError> {
        let fetch_err = |message: String| NewsError::Fetch {
            url: url.to_string(),
            message,
        };
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", resp.status())));
        }
        let body = resp.bytes().map_err(|e| fetch_err(e.to_string()))?;
        rss::Channel::read_from(&body[..]).map_err(|e| NewsError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Market-related items from one channel, in feed order.
    pub fn market_items(&self, channel: &rss::Channel) -> Vec<NewsItem> {
        let keywords: Vec<String> = self
            .config
            .keywords
            .iter()
            .map(|k| k.to_lowercase())
            .collect();

        channel
            .items()
            .iter()
            .take(self.config.max_entries)
            .filter_map(|item| {
                let title = item.title()?.trim().to_string();
                let summary_raw = item.description().map(strip_tags).unwrap_or_default();
                let haystack = format!("{} {}", title.to_lowercase(), summary_raw.to_lowercase());
                if !keywords.iter().any(|k| haystack.contains(k.as_str())) {
                    return None;
                }
                let summary = if summary_raw.is_empty() {
                    title.clone()
                } else {
                    summary_raw
                };
                Some(NewsItem {
                    link: item.link().unwrap_or_default().to_string(),
                    published: item.pub_date().unwrap_or("Recent").to_string(),
                    summary: truncate_chars(&summary, self.config.summary_chars),
                    source: self.config.source_label.clone(),
                    title,
                })
            })
            .collect()
    }
}

impl NewsProvider for RssNewsFeed {
    fn fetch(&self, keyword: Option<&str>, limit: usize) -> Result<Vec<NewsItem>, NewsError> {
        if let Some(keyword) = keyword {
            tracing::debug!(keyword, "ticker keyword ignored, returning general market news");
        }

        let mut items = Vec::new();
        let mut last_error = None;
        for url in &self.config.feeds {
            match self.download(url) {
                Ok(channel) => items.extend(self.market_items(&channel)),
                Err(e) => {
                    tracing::warn!(error = %e, "news feed unavailable");
                    last_error = Some(e);
                }
            }
            if items.len() >= limit {
                break;
            }
        }

        // only an error when no feed produced anything
        match last_error {
            Some(e) if items.is_empty() => Err(e),
            _ => {
                items.truncate(limit);
                Ok(items)
            }
        }
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Business</title><link>https://example.com</link><description>d</description>
  <item>
    <title>PSX gains 800 points as banks rally</title>
    <link>https://example.com/1</link>
    <pubDate>Mon, 03 Jun 2024 10:00:00 +0500</pubDate>
    <description>&lt;p&gt;The benchmark index closed higher.&lt;/p&gt;</description>
  </item>
  <item>
    <title>Cotton prices steady</title>
    <link>https://example.com/2</link>
    <description>Growers await rain.</description>
  </item>
  <item>
    <title>Foreign investors return</title>
    <link>https://example.com/3</link>
    <description>Net buying of shares reached a three-month high.</description>
  </item>
</channel></rss>"#;

    fn feed(config: NewsConfig) -> RssNewsFeed {
        RssNewsFeed::new(config).unwrap()
    }

    fn channel() -> rss::Channel {
        rss::Channel::read_from(FEED.as_bytes()).unwrap()
    }

    #[test]
    fn keeps_market_items_only() {
        let items = feed(NewsConfig::default()).market_items(&channel());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "PSX gains 800 points as banks rally");
        assert_eq!(items[0].summary, "The benchmark index closed higher.");
        assert_eq!(items[0].source, "PSX Market News");
        // matched on summary text
        assert_eq!(items[1].link, "https://example.com/3");
        assert_eq!(items[1].published, "Recent");
    }

    #[test]
    fn respects_entry_window_and_summary_length() {
        let config = NewsConfig {
            max_entries: 1,
            summary_chars: 10,
            ..NewsConfig::default()
        };
        let items = feed(config).market_items(&channel());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].summary.chars().count(), 10);
    }

    #[test]
    fn strip_tags_collapses_whitespace() {
        assert_eq!(strip_tags("<p>a  <b>b</b></p>\n c"), "a b c");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
