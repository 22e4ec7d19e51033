use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use headline_filter::{
    config::parse_feed_list,
    ingest_headlines,
    rss_utils::{time, url},
    FeedParser, FeedSource, FilterError, RawFeedItem, Result,
};
use std::collections::HashMap;
use std::sync::Once;
use tokio::sync::Mutex;

static INIT: Once = Once::new();

fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Serves canned items per URL and records the order URLs were requested in.
struct FakeFeedSource {
    feeds: HashMap<String, Vec<RawFeedItem>>,
    requested: Mutex<Vec<String>>,
}

impl FakeFeedSource {
    fn new(feeds: Vec<(&str, Vec<RawFeedItem>)>) -> Self {
        Self {
            feeds: feeds.into_iter().map(|(u, items)| (u.to_string(), items)).collect(),
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FeedSource for FakeFeedSource {
    fn source_name(&self) -> String {
        "fake".to_string()
    }

    async fn fetch(&self, url: &str) -> Result<Vec<RawFeedItem>> {
        self.requested.lock().await.push(url.to_string());
        self.feeds.get(url).cloned().ok_or_else(|| FilterError::SourceRetrieval {
            url: url.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

fn raw(title: &str, published: Option<DateTime<Utc>>) -> RawFeedItem {
    RawFeedItem {
        title: Some(title.to_string()),
        link: Some(format!("https://example.com/{}", title.to_lowercase().replace(' ', "-"))),
        published,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn test_ingest_keeps_feed_order_and_skips_failures() {
    init_tracing();
    let recent = Some(now() - Duration::days(1));
    let source = FakeFeedSource::new(vec![
        ("https://a.example/rss", vec![raw("A1", recent), raw("A2", recent)]),
        ("https://c.example/rss", vec![raw("C1", recent)]),
    ]);
    let urls = vec![
        "https://a.example/rss".to_string(),
        "https://broken.example/rss".to_string(),
        "https://c.example/rss".to_string(),
    ];

    let items = ingest_headlines(&source, &urls, time::retention_cutoff(now())).await;

    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["A1", "A2", "C1"]);
    assert_eq!(items[0].link, "https://example.com/a1");
    assert_eq!(*source.requested.lock().await, urls);
}

#[tokio::test]
async fn test_ingest_applies_retention_window() {
    init_tracing();
    let cutoff = time::retention_cutoff(now());
    let source = FakeFeedSource::new(vec![(
        "https://news.example/rss",
        vec![
            raw("Fresh", Some(now() - Duration::days(3))),
            raw("Stale", Some(now() - Duration::days(40))),
            raw("Undated", None),
            raw("At cutoff", Some(cutoff)),
            raw("Just before cutoff", Some(cutoff - Duration::seconds(1))),
        ],
    )]);

    let items = ingest_headlines(&source, &["https://news.example/rss".to_string()], cutoff).await;

    let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Fresh", "Undated", "At cutoff"]);
    assert!(items[1].published_at.is_none());
}

#[tokio::test]
async fn test_ingest_with_no_reachable_feeds() {
    let source = FakeFeedSource::new(vec![]);
    let items = ingest_headlines(&source, &["https://down.example/rss".to_string()], now()).await;
    assert!(items.is_empty());
}

#[test]
fn test_retention_cutoff_is_one_calendar_month() {
    assert_eq!(
        time::retention_cutoff(now()),
        Utc.with_ymd_and_hms(2025, 2, 15, 12, 0, 0).unwrap()
    );
    assert_eq!(
        time::retention_cutoff(Utc.with_ymd_and_hms(2025, 3, 31, 8, 0, 0).unwrap()),
        Utc.with_ymd_and_hms(2025, 2, 28, 8, 0, 0).unwrap()
    );

    let cutoff = time::retention_cutoff(now());
    assert!(time::is_expired(cutoff - Duration::seconds(1), cutoff));
    assert!(!time::is_expired(cutoff, cutoff));
}

#[test]
fn test_parse_feed_list() {
    let text = "# news\nhttps://a.example/rss\n\n   \n  https://b.example/atom  \n\
                #https://disabled.example/rss\n";
    assert_eq!(
        parse_feed_list(text),
        vec!["https://a.example/rss".to_string(), "https://b.example/atom".to_string()]
    );
    assert!(parse_feed_list("").is_empty());
}

#[test]
fn test_url_utilities() {
    assert!(url::is_valid_rss_url("https://example.com/feed.xml"));
    assert!(url::is_valid_rss_url("http://example.com/rss"));
    assert!(!url::is_valid_rss_url("ftp://example.com/feed"));
    assert!(!url::is_valid_rss_url("invalid-url"));

    assert_eq!(url::extract_domain("https://www.wsj.com/feed"), Some("www.wsj.com".to_string()));
    assert_eq!(url::extract_domain("invalid-url"), None);
}

const RSS_DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example News</title>
    <link>https://news.example.com</link>
    <description>Test feed</description>
    <item>
      <title>  Local bakery wins award  </title>
      <link>https://news.example.com/bakery</link>
      <pubDate>Fri, 14 Mar 2025 09:30:00 GMT</pubDate>
    </item>
    <item>
      <title>Parliament debates new bill</title>
      <link>https://news.example.com/bill</link>
      <pubDate>sometime last week</pubDate>
    </item>
    <item>
      <title>Comet visible tonight</title>
    </item>
  </channel>
</rss>"#;

const ATOM_DOC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Atom</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2025-03-14T18:30:02Z</updated>
  <entry>
    <title>New bridge opens</title>
    <link href="https://atom.example.com/bridge"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <published>2025-03-14T18:30:02Z</published>
    <updated>2025-03-14T18:30:02Z</updated>
  </entry>
</feed>"#;

#[test]
fn test_parse_rss_document() {
    init_tracing();
    assert!(FeedParser::is_valid_feed_content(RSS_DOC));

    let items = FeedParser::new().parse_feed(RSS_DOC).unwrap();

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title.as_deref(), Some("Local bakery wins award"));
    assert_eq!(items[0].link.as_deref(), Some("https://news.example.com/bakery"));
    assert_eq!(
        items[0].published,
        Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap())
    );
    assert_eq!(items[1].published, None);
    assert_eq!(items[2].link, None);
}

#[test]
fn test_parse_atom_document() {
    let items = FeedParser::new().parse_feed(ATOM_DOC).unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title.as_deref(), Some("New bridge opens"));
    assert_eq!(items[0].link.as_deref(), Some("https://atom.example.com/bridge"));
    assert_eq!(
        items[0].published,
        Some(Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 2).unwrap())
    );
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(!FeedParser::is_valid_feed_content("<html><body>Not found</body></html>"));
    let err = FeedParser::new().parse_feed("this is not xml").unwrap_err();
    assert!(matches!(err, FilterError::Parse(_)));
}
