/// DShield Top Attackers Validation
///
/// Prints a read-only summary of the stored attacker snapshots.
use anyhow::{Context, Result};
use clap::Parser;

use dshield_top_attackers::{cli::ValidateCli, config::StoreSettings, db::Database, telemetry, validate};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    telemetry::init();

    let cli = ValidateCli::parse();
    cli.validate()?;

    let settings = StoreSettings::from_env(&cli.store.overrides()).context("Invalid MongoDB configuration")?;
    let database = Database::new(&settings).await.context("Failed to create MongoDB client")?;
    database.test_connection().await.context("Failed to connect to MongoDB")?;

    let report = validate::collect_report(&database, &database.settings().namespace(), cli.sample_size)
        .await
        .context("Validation queries failed")?;

    print!("{}", report);

    Ok(())
}
