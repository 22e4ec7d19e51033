pub mod types;
pub mod traits;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod sources;
pub mod aggregator;
pub mod filter;
pub mod llm_adapter;
pub mod output;
pub mod pipeline;
pub mod rss_utils;

pub use types::*;
pub use traits::{Classifier, FeedSource};
pub use config::{Cli, RunConfig};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use sources::RssFeedSource;
pub use aggregator::ingest_headlines;
pub use filter::{build_prompt, gap, partition_response, IndexPolicy, RelevanceFilter};
pub use llm_adapter::{GeminiAdapter, MockClassifier};
pub use pipeline::RunReport;
