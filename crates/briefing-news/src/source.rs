use async_trait::async_trait;
use briefing_core::config::{HttpConfig, NewsConfig};
use briefing_core::Headline;
use tracing::{debug, warn};

use crate::article::extract_article_text;
use crate::error::Result;
use crate::feed::{feed_search_url, parse_feed, to_headline};
use crate::http::RateLimitedClient;

/// Where headlines and article bodies come from.
///
/// Both calls degrade to empty output on failure; a broken feed never aborts
/// the briefing.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Up to `max_items` headlines for a search query, in feed order.
    async fn search(&self, query: &str, max_items: usize) -> Vec<Headline>;

    /// Readable text of the page at `url`, or `""`.
    async fn article_text(&self, url: &str) -> String;
}

/// Google News RSS search.
pub struct GoogleNewsClient {
    client: RateLimitedClient,
    feed_url: String,
    hl: String,
    gl: String,
    ceid: String,
}

impl GoogleNewsClient {
    pub fn new(news: &NewsConfig, http: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: RateLimitedClient::from_config(http)?,
            feed_url: news.feed_url.clone(),
            hl: news.hl.clone(),
            gl: news.gl.clone(),
            ceid: news.ceid.clone(),
        })
    }

    pub async fn try_search(&self, query: &str, max_items: usize) -> Result<Vec<Headline>> {
        let url = feed_search_url(&self.feed_url, query, &self.hl, &self.gl, &self.ceid)?;
        let xml = self.client.get(&url).await?;
        let headlines = parse_feed(&xml)?
            .into_iter()
            .take(max_items)
            .map(to_headline)
            .collect::<Vec<_>>();
        debug!(query, count = headlines.len(), "feed search");
        Ok(headlines)
    }

    pub async fn try_article_text(&self, url: &str) -> Result<String> {
        let html = self.client.get(url).await?;
        extract_article_text(&html)
    }
}

#[async_trait]
impl HeadlineSource for GoogleNewsClient {
    async fn search(&self, query: &str, max_items: usize) -> Vec<Headline> {
        match self.try_search(query, max_items).await {
            Ok(headlines) => headlines,
            Err(e) => {
                warn!(query, error = %e, "feed search failed");
                Vec::new()
            }
        }
    }

    async fn article_text(&self, url: &str) -> String {
        match self.try_article_text(url).await {
            Ok(text) => text,
            Err(e) => {
                debug!(url, error = %e, "article fetch failed");
                String::new()
            }
        }
    }
}
