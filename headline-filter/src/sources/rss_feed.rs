use crate::traits::FeedSource;
use crate::types::{FetchConfig, FilterError, RawFeedItem, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::{info, warn};

/// Feed source backed by HTTP retrieval and feed-rs parsing.
pub struct RssFeedSource {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl RssFeedSource {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(),
        })
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    fn source_name(&self) -> String {
        "RSS/Atom over HTTP".to_string()
    }

    async fn fetch(&self, url: &str) -> Result<Vec<RawFeedItem>> {
        let content = self.fetcher.fetch_feed(url).await?;

        if !FeedParser::is_valid_feed_content(&content) {
            warn!("Response from {} does not look like a feed document", url);
            return Err(FilterError::SourceRetrieval {
                url: url.to_string(),
                reason: "response is not an RSS or Atom document".to_string(),
            });
        }

        let items = self.parser.parse_feed(&content)?;
        info!("Pulled {} items from {}", items.len(), url);
        Ok(items)
    }
}
