use crate::rss_utils;
use crate::traits::FeedSource;
use crate::types::HeadlineItem;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Retrieve every feed in `urls`, one after another, and concatenate the
/// surviving items.
///
/// A feed that fails to fetch or parse is logged and skipped. Items published
/// before `cutoff` are dropped; items without a usable date are kept. Output
/// order is feed order, then entry order within each feed, and that order
/// defines the indices the classifier refers to.
pub async fn ingest_headlines(
    source: &dyn FeedSource,
    urls: &[String],
    cutoff: DateTime<Utc>,
) -> Vec<HeadlineItem> {
    let mut headlines = Vec::new();

    for url in urls {
        let raw_items = match source.fetch(url).await {
            Ok(items) => items,
            Err(e) => {
                error!("Error fetching feed {}: {}", url, e);
                continue;
            }
        };

        let total = raw_items.len();
        let mut expired = 0;

        for raw in raw_items {
            let item = HeadlineItem::from(raw);

            match item.published_at {
                Some(published) if rss_utils::time::is_expired(published, cutoff) => {
                    expired += 1;
                    continue;
                }
                Some(_) => {}
                None => {
                    warn!(
                        "Unable to parse the published date of '{}' from {}, keeping it",
                        item.title, url
                    );
                }
            }

            headlines.push(item);
        }

        info!(
            "Kept {} of {} items from {} ({} older than {})",
            total - expired,
            total,
            rss_utils::url::extract_domain(url).unwrap_or_else(|| url.clone()),
            expired,
            cutoff.format("%Y-%m-%d")
        );
    }

    info!("Ingested {} headlines from {} feeds", headlines.len(), urls.len());
    headlines
}
