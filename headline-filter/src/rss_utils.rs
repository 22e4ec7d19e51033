/// Small helpers shared by the fetcher and the aggregator

/// URL utilities for feed sources
pub mod url {
    use url::Url;

    /// Extract domain from URL
    pub fn extract_domain(url_str: &str) -> Option<String> {
        Url::parse(url_str).ok()?.domain().map(|d| d.to_string())
    }

    /// Only http and https feeds can be fetched
    pub fn is_valid_rss_url(url_str: &str) -> bool {
        if let Ok(url) = Url::parse(url_str) {
            url.scheme() == "http" || url.scheme() == "https"
        } else {
            false
        }
    }
}

/// Retention window arithmetic
pub mod time {
    use chrono::{DateTime, Months, Utc};

    /// Items published before this instant are dropped during ingestion.
    ///
    /// One calendar month before `now`. When the previous month is shorter the
    /// day is clamped to its last day (31 March gives 28 or 29 February).
    pub fn retention_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_months(Months::new(1)).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Strictly older than the cutoff. An item published exactly at the cutoff stays.
    pub fn is_expired(published: DateTime<Utc>, cutoff: DateTime<Utc>) -> bool {
        published < cutoff
    }
}
