// ABOUTME: Migrate command - copy table schemas and items between accounts
// ABOUTME: Connects both accounts and drives the orchestrator, or prints a dry-run plan

use crate::config::MigratorConfig;
use crate::dynamodb::{self, TableStore};
use crate::migration::{MigrationPlan, Orchestrator};
use crate::utils::format_elapsed;
use anyhow::{Context, Result};

/// Copy every table from the source account to the target account
///
/// Performs the migration in steps:
/// 1. Lists tables in both accounts and diffs the table-name sets
/// 2. Creates each table missing from the target using the source's
///    attribute definitions, key schema and throughput, waiting after
///    each create
/// 3. Scans every source table and writes each item into the
///    same-named target table
///
/// With `dry_run`, only step 1 runs and the plan is logged.
///
/// # Arguments
///
/// * `config` - Source/target accounts and migration options
/// * `dry_run` - Plan only; create no tables and write no items
///
/// # Errors
///
/// This function will return an error if:
/// - Either account's client cannot be built
/// - Listing tables fails in either account
/// - A missing table's schema cannot be read from the source
/// - Creating a table fails (including when it already exists)
/// - Any scan or put fails
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use ddb_account_migrator::{commands::migrate, config::load_config};
/// # async fn example() -> Result<()> {
/// let config = load_config("ddb-migrator.toml")?;
/// migrate(&config, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn migrate(config: &MigratorConfig, dry_run: bool) -> Result<()> {
    tracing::info!("Starting DynamoDB migration...");
    tracing::info!("  Source: {}", config.source.display());
    tracing::info!("  Target: {}", config.target.display());

    let source = dynamodb::connect(&config.source)
        .await
        .context("Failed to set up source account client")?;
    let target = dynamodb::connect(&config.target)
        .await
        .context("Failed to set up target account client")?;

    run_migration(&source, &target, config, dry_run).await
}

/// Drive a migration over already connected stores.
pub async fn run_migration<S, T>(
    source: &S,
    target: &T,
    config: &MigratorConfig,
    dry_run: bool,
) -> Result<()>
where
    S: TableStore + ?Sized,
    T: TableStore + ?Sized,
{
    let orchestrator = Orchestrator::new(source, target, &config.options);

    if dry_run {
        let plan = orchestrator
            .plan()
            .await
            .context("Failed to plan migration")?;
        log_plan(&plan);
        return Ok(());
    }

    let report = orchestrator.run().await.context("Migration failed")?;

    tracing::info!("");
    tracing::info!("========================================");
    tracing::info!("Migration Summary");
    tracing::info!("========================================");
    tracing::info!("Tables migrated: {}", report.tables.len());
    tracing::info!("Tables created:  {}", report.created_tables().len());
    tracing::info!("Items copied:    {}", report.total_items());
    tracing::info!("Elapsed:         {}", format_elapsed(report.elapsed));
    tracing::info!("========================================");
    for table in &report.tables {
        tracing::info!(
            "  ✓ {}: {} item(s){}",
            table.name,
            table.items_copied,
            if table.created { " (created)" } else { "" }
        );
    }

    tracing::info!("✅ Migration complete");
    Ok(())
}

fn log_plan(plan: &MigrationPlan) {
    tracing::info!("");
    tracing::info!("Dry run - no tables will be created and no items written");
    if plan.source_tables.is_empty() {
        tracing::warn!("⚠ No tables to migrate");
        return;
    }
    for table in &plan.source_tables {
        if plan.is_missing(table) {
            tracing::info!("  + create {} then copy items", table);
        } else {
            tracing::info!("  ~ copy items into existing {}", table);
        }
    }
    tracing::info!(
        "{} table(s) to create, {} table(s) to copy",
        plan.missing_tables.len(),
        plan.source_tables.len()
    );
}
