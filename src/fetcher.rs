use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::model::FeedItem;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// How many items to keep per section. Upstream order is recency
/// order, so the first entries are the newest.
pub const ITEMS_PER_SECTION: usize = 3;

/// Source label used when an item link is missing or not a valid URL.
pub const DEFAULT_SOURCE: &str = "news.google.com";

/// Errors from fetching and parsing a single feed. All of these are
/// recoverable: the aggregator absorbs them and falls back to the
/// previous data for the affected section.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    Status(u16),
    /// Document could not be parsed as RSS or Atom
    #[error("parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Fetches one feed URL into a normalized item list. The cache and
/// aggregator only see this trait, so tests can substitute a scripted
/// implementation.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedItem>, FeedError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent("DailyBrief/1.0 (news aggregator)")
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FetchFeed for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedItem>, FeedError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        Ok(items_from_feed(feed))
    }
}

/// Normalize a parsed feed into at most [`ITEMS_PER_SECTION`] items,
/// preserving upstream order.
pub fn items_from_feed(feed: feed_rs::model::Feed) -> Vec<FeedItem> {
    feed.entries
        .into_iter()
        .take(ITEMS_PER_SECTION)
        .map(|entry| {
            let title = entry.title.map(|t| t.content).unwrap_or_default();
            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();
            let source = source_from_link(&link);

            FeedItem {
                title,
                link,
                source,
            }
        })
        .collect()
}

/// Derive the source label for an item: the hostname of its link with
/// one leading "www." stripped, or [`DEFAULT_SOURCE`] if the link has
/// no parseable host.
pub fn source_from_link(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.host_str()
                .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
        })
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}
