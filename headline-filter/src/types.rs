use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingested article. Immutable once built by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineItem {
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(skip)]
    pub published_at: Option<DateTime<Utc>>,
}

impl HeadlineItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published_at: None,
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// An entry as handed back by a feed source, before retention filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    /// `None` when the feed carried no date or one that could not be parsed
    pub published: Option<DateTime<Utc>>,
}

impl From<RawFeedItem> for HeadlineItem {
    fn from(raw: RawFeedItem) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            link: raw.link.unwrap_or_default(),
            published_at: raw.published,
        }
    }
}

/// Kept and dropped headlines, both in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub kept: Vec<HeadlineItem>,
    pub dropped: Vec<HeadlineItem>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            // Several news sites refuse requests from unknown agents
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

/// Sampling parameters sent with every classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_k: 40,
            top_p: 0.95,
            // Far more than a list of indices needs
            max_output_tokens: 8192,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to retrieve feed {url}: {reason}")]
    SourceRetrieval { url: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(String),

    #[error("Classification call failed: {0}")]
    Classification(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
