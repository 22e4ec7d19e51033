use crate::traits::Classifier;
use crate::types::{FilterError, HeadlineItem, Partition, Result, SamplingConfig};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How to treat indices that do not increase strictly.
///
/// The model is asked for an ascending list but nothing enforces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexPolicy {
    /// Accept every in-range index in the order given. A repeated index is kept
    /// twice and an out-of-order one opens no gap, so `dropped` may miss items
    /// or repeat them.
    #[default]
    AsGiven,
    /// Skip any index not greater than the previous kept one. `kept` and
    /// `dropped` then partition the input exactly.
    StrictAscending,
}

/// Integers strictly between `a` and `b`, ascending. Empty when `b <= a + 1`.
pub fn gap(a: i64, b: i64) -> Vec<i64> {
    if b <= a.saturating_add(1) {
        return Vec::new();
    }
    (a + 1..b).collect()
}

/// One line per headline: `"<index> <title>"`.
pub fn build_prompt(items: &[HeadlineItem]) -> String {
    let mut prompt = String::new();
    for (idx, item) in items.iter().enumerate() {
        let _ = writeln!(prompt, "{} {}", idx, item.title);
    }
    prompt
}

/// Split `items` into kept and dropped from the model's comma-separated list
/// of indices to keep.
///
/// Every index between two consecutive kept indices is dropped, as is every
/// index after the last kept one. Tokens that are not integers or fall outside
/// `0..items.len()` are logged and skipped.
pub fn partition_response(
    items: &[HeadlineItem],
    response: &str,
    policy: IndexPolicy,
) -> Partition {
    let mut partition = Partition::default();
    let len = items.len() as i64;
    // last kept index
    let mut cursor: i64 = -1;

    for token in response.split(',') {
        let token = token.trim();
        let index: i64 = match token.parse() {
            Ok(index) => index,
            Err(e) => {
                warn!("Unable to convert '{}' to an index: {}", token, e);
                continue;
            }
        };

        if index < 0 || index >= len {
            warn!("Index {} is out of range for {} headlines", index, len);
            continue;
        }

        if index <= cursor {
            warn!("Index {} does not follow {} in ascending order", index, cursor);
            if policy == IndexPolicy::StrictAscending {
                continue;
            }
        }

        partition.kept.push(items[index as usize].clone());
        for y in gap(cursor, index) {
            partition.dropped.push(items[y as usize].clone());
        }
        cursor = index;
    }

    for y in gap(cursor, len) {
        partition.dropped.push(items[y as usize].clone());
    }

    partition
}

/// Asks the classifier which headlines to keep.
pub struct RelevanceFilter {
    classifier: Arc<dyn Classifier>,
    instruction: String,
    sampling: SamplingConfig,
    policy: IndexPolicy,
}

impl RelevanceFilter {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        instruction: String,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            classifier,
            instruction,
            sampling,
            policy: IndexPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: IndexPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Exactly one classifier call per invocation. A failed call is fatal.
    pub async fn filter(&self, items: &[HeadlineItem]) -> Result<Partition> {
        let prompt = build_prompt(items);

        info!(
            "Calling {} with {} headlines",
            self.classifier.adapter_name(),
            items.len()
        );
        let response = self
            .classifier
            .classify(&prompt, &self.instruction, &self.sampling)
            .await
            .map_err(|e| match e {
                FilterError::Classification(_) => e,
                other => FilterError::Classification(other.to_string()),
            })?;
        debug!("Accepted headlines = {}", response.trim());

        let partition = partition_response(items, &response, self.policy);
        info!(
            "Model kept {} and dropped {} of {} headlines",
            partition.kept.len(),
            partition.dropped.len(),
            items.len()
        );
        Ok(partition)
    }
}
