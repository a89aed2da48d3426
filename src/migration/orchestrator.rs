// ABOUTME: Top-level control flow of an account-to-account migration
// ABOUTME: Diffs table sets, creates missing tables, then copies every table's items

use std::time::Duration;
use tokio::time::Instant;

use super::copy::copy_table_items;
use super::plan::{MigrationPlan, TableProgress, TableState};
use crate::config::MigrationOptions;
use crate::dynamodb::{Reader, SchemaProvider, TableStore, Writer};
use crate::error::Result;
use crate::utils::sanitize_identifier;

/// Outcome of a completed migration run.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// One entry per migrated source table, in source order
    pub tables: Vec<TableProgress>,
    pub elapsed: Duration,
}

impl MigrationReport {
    pub fn created_tables(&self) -> Vec<&str> {
        self.tables
            .iter()
            .filter(|t| t.created)
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn total_items(&self) -> usize {
        self.tables.iter().map(|t| t.items_copied).sum()
    }
}

/// Runs a migration between two accounts.
///
/// The orchestrator is strictly sequential: every store call completes
/// before the next one starts, and a table's data copy only begins after
/// that table exists in the destination (and, for created tables, after
/// the configured wait).
pub struct Orchestrator<'a, S: TableStore + ?Sized, T: TableStore + ?Sized> {
    source: &'a S,
    target: &'a T,
    options: &'a MigrationOptions,
}

impl<'a, S: TableStore + ?Sized, T: TableStore + ?Sized> Orchestrator<'a, S, T> {
    pub fn new(source: &'a S, target: &'a T, options: &'a MigrationOptions) -> Self {
        Self {
            source,
            target,
            options,
        }
    }

    /// List both accounts and diff their table sets without changing anything.
    pub async fn plan(&self) -> Result<MigrationPlan> {
        let source_reader = Reader::new(self.source, self.options.pagination);
        let target_reader = Reader::new(self.target, self.options.pagination);

        let source_tables = self
            .options
            .filter
            .apply(source_reader.list_tables().await?);
        if source_tables.is_empty() {
            tracing::info!("No tables found in source account {}", self.source.label());
        } else {
            tracing::info!(
                "Tables found in source account {}: {:?}",
                self.source.label(),
                source_tables
            );
        }

        let target_tables = target_reader.list_tables().await?;
        tracing::debug!(
            "Tables found in destination account {}: {:?}",
            self.target.label(),
            target_tables
        );

        Ok(MigrationPlan::new(source_tables, target_tables))
    }

    /// Run the full migration
    ///
    /// 1. Lists source and destination tables
    /// 2. Creates every source table missing from the destination, using the
    ///    source schema, then waits per `create_wait`
    /// 3. Copies all items of every source table into the same-named
    ///    destination table
    ///
    /// # Errors
    ///
    /// Any failure aborts the run: a schema lookup failure for a missing
    /// table (logged, then returned), a create failure (including a table
    /// that appeared since the listing), or any scan/put service error.
    /// Nothing is rolled back; re-running is safe because existing tables
    /// are skipped and puts overwrite by key.
    pub async fn run(&self) -> Result<MigrationReport> {
        let started = Instant::now();
        let plan = self.plan().await?;

        let mut tables: Vec<TableProgress> = plan
            .source_tables
            .iter()
            .map(TableProgress::new)
            .collect();

        if plan.sets_equal() {
            tracing::info!("All tables are found in both accounts!");
        } else if plan.missing_tables.is_empty() {
            tracing::info!("No source tables are missing in the destination");
        } else {
            tracing::info!(
                "Missing tables in destination: {:?}",
                plan.missing_tables
            );
        }

        let writer = Writer::new(self.target);
        for progress in tables.iter_mut() {
            if !plan.is_missing(&progress.name) {
                progress.advance(TableState::SkippedExisting);
                continue;
            }

            let table = progress.name.clone();
            tracing::info!(
                "Creating table {} in destination account. This may take a few seconds",
                sanitize_identifier(&table)
            );

            let schema = match self.source.table_schema(&table).await {
                Ok(schema) => schema,
                Err(e) => {
                    tracing::error!(
                        "Failed to retrieve attributes from source table '{}': {}",
                        sanitize_identifier(&table),
                        e
                    );
                    return Err(e);
                }
            };
            progress.advance(TableState::Diffed);

            writer.create_table(&table, &schema).await?;
            writer
                .wait_for_table(&table, self.options.create_wait)
                .await?;
            progress.advance(TableState::Created);
            tracing::info!("✓ Created table '{}'", sanitize_identifier(&table));
        }

        let reader = Reader::new(self.source, self.options.pagination);
        for progress in tables.iter_mut() {
            progress.items_copied = copy_table_items(&reader, &writer, &progress.name).await?;
            progress.advance(TableState::DataCopied);
        }

        Ok(MigrationReport {
            tables,
            elapsed: started.elapsed(),
        })
    }
}
