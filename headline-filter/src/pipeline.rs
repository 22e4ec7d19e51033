use crate::aggregator::ingest_headlines;
use crate::config::{self, RunConfig};
use crate::filter::RelevanceFilter;
use crate::rss_utils;
use crate::traits::{Classifier, FeedSource};
use crate::types::{HeadlineItem, Partition, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Outcome of one ingest-then-filter run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Everything ingested, in the order the classifier saw it
    pub headlines: Vec<HeadlineItem>,
    pub partition: Partition,
}

impl RunReport {
    pub fn kept(&self) -> &[HeadlineItem] {
        &self.partition.kept
    }

    /// All, accepted and dropped headlines, for eyeballing the model's choices.
    pub fn log_debug_report(&self) {
        info!("All headlines");
        for (i, item) in self.headlines.iter().enumerate() {
            info!("{} {}", i, item.title);
        }
        info!("********Accepted headlines**********");
        for item in &self.partition.kept {
            info!("{}", item.title);
        }
        info!("**************Dropped headlines***********");
        for item in &self.partition.dropped {
            info!("{}", item.title);
        }
    }
}

/// Read the inputs named by `config`, ingest every feed and ask `classifier`
/// which headlines to keep. Emission is left to the caller.
pub async fn run(
    config: &RunConfig,
    source: &dyn FeedSource,
    classifier: Arc<dyn Classifier>,
) -> Result<RunReport> {
    run_at(config, source, classifier, Utc::now()).await
}

/// As [`run`], with the retention window measured from `now`.
pub async fn run_at(
    config: &RunConfig,
    source: &dyn FeedSource,
    classifier: Arc<dyn Classifier>,
    now: DateTime<Utc>,
) -> Result<RunReport> {
    let urls = config::load_feed_urls(&config.feeds_path)?;
    let instruction = config::load_instruction(&config.instruction_path)?;

    info!("Fetching {} feeds via {}", urls.len(), source.source_name());
    let cutoff = rss_utils::time::retention_cutoff(now);
    let headlines = ingest_headlines(source, &urls, cutoff).await;

    let filter = RelevanceFilter::new(classifier, instruction, config.sampling.clone())
        .with_policy(config.index_policy);
    let partition = filter.filter(&headlines).await?;

    let report = RunReport {
        headlines,
        partition,
    };
    if config.debug {
        report.log_debug_report();
    }
    Ok(report)
}
