/// CLI Module
///
/// Command-line interface configuration using clap. Every flag is optional;
/// both binaries run with no arguments using environment values and defaults.
use clap::{Args, Parser};

use crate::config::{self, StoreOverrides};

/// MongoDB location flags shared by both binaries
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// MongoDB connection string (overrides MONGO_URI env var)
    #[arg(long, value_name = "URI")]
    pub mongo_uri: Option<String>,

    /// Database name (overrides MONGO_DB env var)
    #[arg(long, value_name = "NAME")]
    pub mongo_db: Option<String>,

    /// Collection name (overrides MONGO_COLLECTION env var)
    #[arg(long, value_name = "NAME")]
    pub mongo_collection: Option<String>,
}

impl StoreArgs {
    pub fn overrides(&self) -> StoreOverrides {
        StoreOverrides {
            uri: self.mongo_uri.clone(),
            database: self.mongo_db.clone(),
            collection: self.mongo_collection.clone(),
        }
    }
}

/// DShield Top Attackers - ETL Pipeline
///
/// Download the DShield attacker feed, parse it, and append the snapshot to MongoDB
#[derive(Parser, Debug)]
#[command(name = "dshield-etl")]
#[command(author, version, about, long_about = None)]
pub struct EtlCli {
    /// Feed URL to download
    #[arg(long, value_name = "URL", env = "FEED_URL", default_value = config::FEED_URL)]
    pub feed_url: String,

    /// Maximum number of fetch attempts
    #[arg(long, value_name = "COUNT", default_value_t = config::DEFAULT_MAX_RETRIES)]
    pub max_retries: usize,

    /// Base backoff in seconds, scaled by the attempt number
    #[arg(long, value_name = "SECONDS", default_value_t = config::DEFAULT_BACKOFF_SECS)]
    pub backoff_secs: f64,

    /// Per-attempt request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    #[command(flatten)]
    pub store: StoreArgs,
}

impl EtlCli {
    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_retries == 0 {
            anyhow::bail!("Max retries must be greater than 0");
        }

        config::backoff_from_secs(self.backoff_secs)?;

        if self.timeout_secs == 0 {
            anyhow::bail!("Timeout must be greater than 0");
        }

        Ok(())
    }
}

/// DShield Top Attackers - Store Validation
///
/// Print a read-only summary of what the ETL pipeline has stored
#[derive(Parser, Debug)]
#[command(name = "dshield-validate")]
#[command(author, version, about, long_about = None)]
pub struct ValidateCli {
    /// Number of sample documents to print
    #[arg(long, value_name = "COUNT", default_value_t = config::DEFAULT_SAMPLE_SIZE)]
    pub sample_size: i64,

    #[command(flatten)]
    pub store: StoreArgs,
}

impl ValidateCli {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sample_size <= 0 {
            anyhow::bail!("Sample size must be greater than 0");
        }
        Ok(())
    }
}
