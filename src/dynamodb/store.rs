// ABOUTME: Capability traits over one account's DynamoDB endpoint
// ABOUTME: Page-level primitives plus schema lookup shared by readers and writers

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{TableDescription, TableStatus};

use super::schema::TableSchema;
use super::Item;
use crate::error::{MigratorError, Result};

/// One page of `ListTables`.
#[derive(Debug, Clone, Default)]
pub struct TableNamesPage {
    pub table_names: Vec<String>,
    /// `LastEvaluatedTableName`; `None` once the listing is exhausted.
    pub next_start: Option<String>,
}

/// One page of `Scan`.
#[derive(Debug, Clone, Default)]
pub struct ItemsPage {
    pub items: Vec<Item>,
    /// `LastEvaluatedKey`; `None` once the scan is exhausted.
    pub next_start: Option<Item>,
}

/// The five control/data-plane calls the migrator needs from an account.
///
/// Every call is a single request; paging and waiting are layered on top by
/// [`Reader`](super::Reader) and [`Writer`](super::Writer).
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Human-readable name of the account this store talks to.
    fn label(&self) -> &str;

    async fn list_tables_page(&self, start: Option<String>) -> Result<TableNamesPage>;

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription>;

    async fn create_table(&self, table_name: &str, schema: &TableSchema) -> Result<()>;

    async fn scan_page(&self, table_name: &str, start: Option<Item>) -> Result<ItemsPage>;

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()>;
}

/// Schema lookup for a single table.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    async fn table_schema(&self, table_name: &str) -> Result<TableSchema>;

    async fn table_status(&self, table_name: &str) -> Result<Option<TableStatus>>;
}

#[async_trait]
impl<T: TableStore + ?Sized> SchemaProvider for T {
    async fn table_schema(&self, table_name: &str) -> Result<TableSchema> {
        tracing::info!("Getting table description/attributes for '{}'", table_name);
        let description = self.describe_table(table_name).await?;
        TableSchema::from_description(table_name, &description)
    }

    async fn table_status(&self, table_name: &str) -> Result<Option<TableStatus>> {
        let description = self.describe_table(table_name).await?;
        Ok(description.table_status)
    }
}

/// Structural equality of two in-memory values, logged for information only.
pub fn compare<T: PartialEq + ?Sized>(a: &T, b: &T) -> bool {
    let same = a == b;
    if same {
        tracing::info!("The contents of the tables are the same");
    } else {
        tracing::info!("The contents of the tables are different");
    }
    same
}

/// True when `err` is DynamoDB's "no such table" answer.
pub fn is_not_found(err: &MigratorError) -> bool {
    err.service_code() == Some("ResourceNotFoundException")
}
