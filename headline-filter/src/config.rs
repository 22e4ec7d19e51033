use crate::filter::IndexPolicy;
use crate::llm_adapter::DEFAULT_GEMINI_MODEL;
use crate::types::{FetchConfig, FilterError, Result, SamplingConfig};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Aggregate RSS headlines and let a language model drop the political ones.
#[derive(Debug, Parser)]
#[command(name = "headline-filter", version, about)]
pub struct Cli {
    /// Enable debug mode: log every headline and what happened to it
    #[arg(long)]
    pub debug: bool,

    /// Gemini model
    #[arg(long, default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    /// File containing feed URLs to fetch
    #[arg(long, default_value = "feeds.txt")]
    pub feeds: PathBuf,

    /// Path to file containing the filter instructions
    #[arg(long, default_value = "instruction.txt")]
    pub instruction: PathBuf,

    /// Output file; the JSON goes to stdout when omitted
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Ignore indices in the model's answer that are not strictly ascending
    #[arg(long)]
    pub strict_indices: bool,
}

impl Cli {
    pub fn into_config(self) -> RunConfig {
        RunConfig {
            debug: self.debug,
            model: self.model,
            feeds_path: self.feeds,
            instruction_path: self.instruction,
            output_path: self.out,
            index_policy: if self.strict_indices {
                IndexPolicy::StrictAscending
            } else {
                IndexPolicy::AsGiven
            },
            sampling: SamplingConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Everything a run needs, built once at startup and passed down by reference.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub debug: bool,
    pub model: String,
    pub feeds_path: PathBuf,
    pub instruction_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub index_policy: IndexPolicy,
    pub sampling: SamplingConfig,
    pub fetch: FetchConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            debug: false,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            feeds_path: PathBuf::from("feeds.txt"),
            instruction_path: PathBuf::from("instruction.txt"),
            output_path: None,
            index_policy: IndexPolicy::default(),
            sampling: SamplingConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Feed URLs, one per line. Blank lines and lines starting with `#` are ignored.
pub fn parse_feed_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn load_feed_urls(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| {
        FilterError::Config(format!("unable to read feeds file {}: {}", path.display(), e))
    })?;
    let urls = parse_feed_list(&text);
    debug!("Loaded {} feed URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// The system instruction, verbatim.
pub fn load_instruction(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        FilterError::Config(format!("unable to read instruction file {}: {}", path.display(), e))
    })
}
