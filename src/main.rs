/// DShield Top Attackers ETL
///
/// Downloads the DShield attacker feed once, parses it, and appends the
/// snapshot to MongoDB.
use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use dshield_top_attackers::{
    cli::EtlCli,
    config::{self, StoreSettings},
    db::Database,
    etl::{FeedFetcher, FetchConfig},
    pipeline::{Pipeline, PipelineConfig, RunOutcome},
    telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    telemetry::init();

    let cli = EtlCli::parse();
    cli.validate()?;

    println!("🚀 Starting DShield Top Attackers ETL...");

    // Configuration problems abort before any network or store activity
    let settings = StoreSettings::from_env(&cli.store.overrides()).context("Invalid MongoDB configuration")?;
    let fetch_config = FetchConfig {
        max_retries: cli.max_retries,
        backoff: config::backoff_from_secs(cli.backoff_secs)?,
        timeout: Duration::from_secs(cli.timeout_secs),
    };

    let fetcher = FeedFetcher::new(fetch_config).context("Failed to create feed fetcher")?;

    println!("\n💾 Connecting to MongoDB ({})...", settings.namespace());
    let database = Database::new(&settings).await.context("Failed to create MongoDB client")?;

    tracing::info!("DShield ETL initialized for {}", settings.namespace());

    let pipeline = Pipeline::new(fetcher, &database, PipelineConfig { feed_url: cli.feed_url.clone() });
    let stats = pipeline.run().await;

    match stats.outcome {
        RunOutcome::Completed => println!("\n✨ Ingestion run complete!"),
        RunOutcome::FetchFailed => println!("\n⚠️ Ingestion run ended without data"),
    }

    Ok(())
}
