//! PromoSync CLI - inspect a creator's plan, quotas and dashboard metrics.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;

use promosync::adapters::{FileStore, InMemoryStore, PostgresStore, SystemClock};
use promosync::application::SessionContext;
use promosync::config::{AppConfig, StorageBackend, StorageConfig};
use promosync::domain::entitlement::MeteredFeature;
use promosync::domain::foundation::UserId;
use promosync::domain::metrics::MetricsPeriod;
use promosync::ports::Persistence;

#[derive(Parser)]
#[command(name = "promosync")]
#[command(about = "PromoSync - plan entitlements, usage and deal metrics for a creator")]
#[command(version)]
struct Cli {
    /// Subscriber to load
    #[arg(default_value = "demo")]
    user_id: String,

    /// Metrics period: 7d, 30d, 90d, 1y or all
    #[arg(short, long, default_value = "30d")]
    period: MetricsPeriod,

    /// Switch the subscriber to another tier before reporting
    #[arg(long, value_name = "TIER")]
    set_tier: Option<String>,

    /// Record one use of a metered feature (e.g. mediaKits)
    #[arg(long, value_name = "FEATURE")]
    consume: Option<String>,

    /// Rebuild the stored metrics rollup before reporting
    #[arg(long)]
    recalculate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().context("loading configuration")?;
    config.validate().context("validating configuration")?;
    config.logging.init()?;

    let store = open_store(&config.storage).await?;
    let user_id = UserId::new(cli.user_id)?;
    let session = SessionContext::start(user_id, store, Arc::new(SystemClock)).await?;
    let entitlements = session.entitlements();

    if let Some(tier) = cli.set_tier.as_deref() {
        entitlements.set_tier_id(tier).await?;
    }

    if let Some(name) = cli.consume.as_deref() {
        let Some(feature) = MeteredFeature::from_name(name) else {
            bail!("'{}' is not a metered feature", name);
        };
        let result = entitlements.consume(feature).await?;
        if let Err(reason) = result.into_result() {
            eprintln!("{}", reason.user_message());
        }
        println!("{}", entitlements.limit_notice(feature).await?);
    }

    if cli.recalculate {
        session.recalculate_metrics().await?;
    }

    let snapshot = entitlements.snapshot().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    let metrics = session.metrics(cli.period).await;
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    Ok(())
}

async fn open_store(config: &StorageConfig) -> Result<Arc<dyn Persistence>> {
    let store: Arc<dyn Persistence> = match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::File => Arc::new(FileStore::new(&config.path)),
        StorageBackend::Postgres => Arc::new(
            PostgresStore::connect(&config.database)
                .await
                .context("connecting to postgres")?,
        ),
    };
    tracing::debug!(backend = ?config.backend, "Document store ready");
    Ok(store)
}
