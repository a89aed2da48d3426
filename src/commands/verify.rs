// ABOUTME: Verify command implementation - Validate data integrity
// ABOUTME: Compares item checksums and counts between source and target tables

use crate::config::MigratorConfig;
use crate::dynamodb::{self, compare, Reader, TableStore};
use crate::migration::{compare_tables, ChecksumResult};
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};

/// Tables verified concurrently; verification only reads.
const VERIFY_CONCURRENCY: usize = 4;

/// Verify data integrity between source and target accounts
///
/// 1. Lists all (filtered) tables in the source account
/// 2. Scans each table in both accounts and compares checksums and item counts
/// 3. Reports mismatches and tables missing from the target
///
/// Up to 4 tables are verified concurrently, with a progress bar.
///
/// # Errors
///
/// Returns an error if either account cannot be listed, or if any table
/// is missing, differs, or cannot be scanned.
pub async fn verify(config: &MigratorConfig) -> Result<()> {
    tracing::info!("Starting data integrity verification...");
    tracing::info!("");

    let source = dynamodb::connect(&config.source)
        .await
        .context("Failed to set up source account client")?;
    let target = dynamodb::connect(&config.target)
        .await
        .context("Failed to set up target account client")?;

    verify_stores(&source, &target, config).await
}

/// Verify over already connected stores.
pub async fn verify_stores<S, T>(source: &S, target: &T, config: &MigratorConfig) -> Result<()>
where
    S: TableStore + ?Sized,
    T: TableStore + ?Sized,
{
    let source_reader = Reader::new(source, config.options.pagination);
    let target_reader = Reader::new(target, config.options.pagination);

    tracing::info!("Discovering tables...");
    let mut tables = config.options.filter.apply(
        source_reader
            .list_tables()
            .await
            .context("Failed to list tables from source account")?,
    );
    let mut target_tables = target_reader
        .list_tables()
        .await
        .context("Failed to list tables from target account")?;

    if tables.is_empty() {
        tracing::warn!("⚠ No tables found to verify");
        return Ok(());
    }

    let missing: Vec<String> = tables
        .iter()
        .filter(|t| !target_tables.contains(t))
        .cloned()
        .collect();

    tables.sort();
    target_tables.retain(|t| config.options.filter.should_migrate(t));
    target_tables.sort();
    compare(&tables, &target_tables);

    let present: Vec<String> = tables
        .iter()
        .filter(|t| !missing.contains(t))
        .cloned()
        .collect();

    tracing::info!("Found {} tables to verify", tables.len());
    tracing::info!("Using parallel verification (concurrency: {})", VERIFY_CONCURRENCY);
    tracing::info!("");

    let progress = ProgressBar::new(present.len() as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        progress.set_style(style.progress_chars("##-"));
    }

    let verification_results: Vec<_> = stream::iter(present.iter())
        .map(|table| {
            let pb = progress.clone();
            let source_reader = &source_reader;
            let target_reader = &target_reader;
            async move {
                let result = compare_tables(source_reader, target_reader, table)
                    .await
                    .map_err(|e| (table.clone(), e));
                pb.inc(1);
                pb.set_message(format!("Verified {}", table));
                result
            }
        })
        .buffer_unordered(VERIFY_CONCURRENCY)
        .collect()
        .await;

    progress.finish_with_message("Verification complete");
    tracing::info!("");

    let mut results: Vec<ChecksumResult> = Vec::new();
    let mut mismatches = missing.len();
    let mut matches = 0;

    for table in &missing {
        tracing::error!("  ✗ {}: missing in target account", table);
    }

    for result in verification_results {
        match result {
            Ok(checksum_result) => {
                if checksum_result.is_valid() {
                    tracing::info!(
                        "  ✓ {}: Match ({} items, checksum: {})",
                        checksum_result.table,
                        checksum_result.source_item_count,
                        short(&checksum_result.source_checksum)
                    );
                    matches += 1;
                } else {
                    tracing::error!(
                        "  ✗ {}: MISMATCH: source={} ({} items), target={} ({} items)",
                        checksum_result.table,
                        short(&checksum_result.source_checksum),
                        checksum_result.source_item_count,
                        short(&checksum_result.target_checksum),
                        checksum_result.target_item_count
                    );
                    mismatches += 1;
                }
                results.push(checksum_result);
            }
            Err((table, e)) => {
                tracing::error!("  ✗ ERROR: {}: {}", table, e);
                mismatches += 1;
            }
        }
    }

    tracing::info!("");
    tracing::info!("========================================");
    tracing::info!("Verification Summary");
    tracing::info!("========================================");
    tracing::info!("Total tables: {}", tables.len());
    tracing::info!("✓ Matches: {}", matches);
    tracing::info!("✗ Mismatches: {}", mismatches);
    tracing::info!("========================================");
    tracing::info!("");

    if mismatches > 0 {
        tracing::error!("⚠ DATA INTEGRITY ISSUES DETECTED!");
        tracing::info!("Possible causes:");
        tracing::info!("  - The migration has not been run, or stopped part way");
        tracing::info!("  - Items were written to either account after the migration");
        tracing::info!("  - Target tables held extra items before the migration");
        anyhow::bail!("{} table(s) failed verification", mismatches);
    }

    tracing::info!("✓ ALL TABLES VERIFIED SUCCESSFULLY!");
    tracing::info!(
        "  All {} tables match between source and target",
        results.len()
    );
    Ok(())
}

fn short(checksum: &str) -> &str {
    checksum.get(..8).unwrap_or(checksum)
}
