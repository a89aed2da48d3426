// ABOUTME: Pre-flight validation command for migration readiness
// ABOUTME: Checks connectivity and credentials for both accounts

use crate::config::MigratorConfig;
use crate::dynamodb::{self, Reader};
use anyhow::{bail, Context, Result};

pub async fn validate(config: &MigratorConfig) -> Result<()> {
    tracing::info!("Starting validation...");

    if config.source == config.target {
        tracing::warn!(
            "⚠ Source and target use identical settings ({}); items would be copied onto themselves",
            config.source.display()
        );
    }

    // Step 1: Connect to source
    tracing::info!("Connecting to source account {}...", config.source.display());
    let source = dynamodb::connect(&config.source)
        .await
        .context("Failed to set up source account client")?;
    source
        .ping()
        .await
        .context("Failed to reach source account")?;
    tracing::info!("✓ Connected to source");

    // Step 2: Connect to target
    tracing::info!("Connecting to target account {}...", config.target.display());
    let target = dynamodb::connect(&config.target)
        .await
        .context("Failed to set up target account client")?;
    target
        .ping()
        .await
        .context("Failed to reach target account")?;
    tracing::info!("✓ Connected to target");

    // Step 3: Count tables
    tracing::info!("Listing tables...");
    let source_tables = config
        .options
        .filter
        .apply(
            Reader::new(&source, config.options.pagination)
                .list_tables()
                .await
                .context("Failed to list source tables")?,
        );
    let target_tables = Reader::new(&target, config.options.pagination)
        .list_tables()
        .await
        .context("Failed to list target tables")?;

    let missing = source_tables
        .iter()
        .filter(|t| !target_tables.contains(t))
        .count();
    tracing::info!(
        "✓ Source has {} table(s) to migrate; target has {} table(s); {} would be created",
        source_tables.len(),
        target_tables.len(),
        missing
    );

    if source_tables.is_empty() {
        bail!("No tables to migrate in source account {}", config.source.display());
    }

    tracing::info!("✅ Validation complete - ready for migration");
    Ok(())
}
