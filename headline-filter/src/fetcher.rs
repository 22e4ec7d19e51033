use crate::rss_utils;
use crate::types::{FetchConfig, FilterError, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

/// Plain HTTP GET of feed documents. One attempt per call, no retries.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        let start_time = Instant::now();

        let parsed = Url::parse(url)?;
        if !rss_utils::url::is_valid_rss_url(parsed.as_str()) {
            return Err(FilterError::SourceRetrieval {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        debug!("Fetching feed: {}", url);

        let mut response = self.client.get(parsed).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FilterError::SourceRetrieval {
                url: url.to_string(),
                reason: format!(
                    "HTTP {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let limit_bytes = self.config.max_feed_size_mb * 1024 * 1024;
        if let Some(content_length) = response.content_length() {
            if content_length as usize > limit_bytes {
                return Err(FilterError::FeedTooLarge {
                    size_mb: size_in_mb(content_length as usize),
                });
            }
        }

        // Servers may omit Content-Length, so the cap is enforced while reading too
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() > limit_bytes {
                return Err(FilterError::FeedTooLarge {
                    size_mb: size_in_mb(body.len()),
                });
            }
        }
        let content = String::from_utf8_lossy(&body).into_owned();

        info!(
            "Fetched feed: {} ({} bytes in {} ms)",
            url,
            content.len(),
            start_time.elapsed().as_millis()
        );
        Ok(content)
    }
}

fn size_in_mb(bytes: usize) -> usize {
    bytes.div_ceil(1024 * 1024)
}
