use crate::types::{RawFeedItem, Result, SamplingConfig};
use async_trait::async_trait;

/// Retrieves the entries of a single feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name for logging
    fn source_name(&self) -> String;

    /// Fetch and parse the feed at `url`, returning its entries in feed order
    async fn fetch(&self, url: &str) -> Result<Vec<RawFeedItem>>;
}

/// The external model that decides which headlines to keep.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Name of this adapter, used in logs
    fn adapter_name(&self) -> String;

    /// Send `prompt` under the fixed system `instruction` and return the model's
    /// free-text answer.
    async fn classify(
        &self,
        prompt: &str,
        instruction: &str,
        sampling: &SamplingConfig,
    ) -> Result<String>;
}
