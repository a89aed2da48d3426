// ABOUTME: Table creation and single-item writes for one account
// ABOUTME: Waits for new tables per CreateWait before data is copied into them

use aws_sdk_dynamodb::types::TableStatus;
use std::time::Duration;
use tokio::time::Instant;

use super::schema::TableSchema;
use super::store::{is_not_found, SchemaProvider, TableStore};
use super::Item;
use crate::config::CreateWait;
use crate::error::{MigratorError, Result};

/// Creates tables and writes items into one account.
pub struct Writer<'a, S: TableStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TableStore + ?Sized> Writer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create `table_name` with the given schema.
    ///
    /// # Errors
    ///
    /// Returns `TableCreate` when the table already exists, the schema is
    /// malformed, or account limits are exceeded. The error is never
    /// suppressed here; callers decide what an existing table means.
    pub async fn create_table(&self, table_name: &str, schema: &TableSchema) -> Result<()> {
        tracing::debug!(
            "CreateTable '{}' ({} attribute(s), {} key element(s), {:?} billing)",
            table_name,
            schema.attribute_definitions.len(),
            schema.key_schema.len(),
            schema.billing_mode
        );
        self.store.create_table(table_name, schema).await
    }

    /// Write one item, overwriting any item with the same key. No batching.
    pub async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        self.store.put_item(table_name, item).await
    }

    /// Block until a freshly created table may be written to.
    ///
    /// `Fixed` sleeps unconditionally and does not check the table status.
    /// `UntilActive` polls DescribeTable until the status is ACTIVE.
    pub async fn wait_for_table(&self, table_name: &str, wait: CreateWait) -> Result<()> {
        match wait {
            CreateWait::Fixed(delay) => {
                if !delay.is_zero() {
                    tracing::debug!("Waiting {:?} for '{}' to provision", delay, table_name);
                    tokio::time::sleep(delay).await;
                }
                Ok(())
            }
            CreateWait::UntilActive { timeout, interval } => {
                self.wait_until_active(table_name, timeout, interval).await
            }
        }
    }

    async fn wait_until_active(
        &self,
        table_name: &str,
        timeout: Duration,
        interval: Duration,
    ) -> Result<()> {
        let started = Instant::now();

        loop {
            match self.store.table_status(table_name).await {
                Ok(Some(TableStatus::Active)) => {
                    tracing::debug!(
                        "Table '{}' is ACTIVE after {:?}",
                        table_name,
                        started.elapsed()
                    );
                    return Ok(());
                }
                Ok(status) => {
                    tracing::debug!("Table '{}' status: {:?}", table_name, status);
                }
                // DescribeTable can briefly miss a table right after CreateTable
                Err(err) if is_not_found(&err) => {}
                Err(err) => return Err(err),
            }

            if started.elapsed() >= timeout {
                return Err(MigratorError::TableNotReady {
                    table: table_name.to_string(),
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}
