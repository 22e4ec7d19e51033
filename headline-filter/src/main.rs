use anyhow::Context;
use clap::Parser;
use headline_filter::{output, pipeline, Cli, GeminiAdapter, RssFeedSource};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the key may already be in the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = if cli.debug { "headline_filter=debug,info" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // stdout is reserved for the JSON document
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.into_config();
    info!("Starting headline filter (model {})", config.model);

    let source = RssFeedSource::new(config.fetch.clone()).context("failed to build HTTP client")?;
    let classifier = GeminiAdapter::from_env(config.model.clone())
        .context("error creating Gemini client")?;

    let report = pipeline::run(&config, &source, Arc::new(classifier))
        .await
        .map_err(|e| {
            error!("Run aborted: {}", e);
            e
        })?;

    output::emit(report.kept(), config.output_path.as_deref())
        .context("failed to write headlines")?;

    info!("Headline filter finished");
    Ok(())
}
