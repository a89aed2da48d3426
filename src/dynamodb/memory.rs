// ABOUTME: In-memory TableStore used by unit tests
// ABOUTME: Mimics DynamoDB paging, key-based overwrites, and CREATING→ACTIVE transitions

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, TableDescription, TableStatus};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::schema::TableSchema;
use super::store::{ItemsPage, TableNamesPage, TableStore};
use super::Item;
use crate::error::{CreateFailure, MigratorError, Result};

struct MemoryTable {
    description: TableDescription,
    items: Vec<Item>,
    creating_polls_left: usize,
}

#[derive(Default)]
struct Inner {
    tables: BTreeMap<String, MemoryTable>,
    calls: Vec<String>,
    failing_puts: Vec<String>,
}

pub struct MemoryStore {
    label: String,
    page_size: usize,
    creating_polls: usize,
    inner: Mutex<Inner>,
}

/// Item keyed like `users_schema()`: `user_id` (S) + `created_at` (N).
pub fn item(user_id: &str, created_at: i64) -> Item {
    let mut item = HashMap::new();
    item.insert("user_id".to_string(), AttributeValue::S(user_id.to_string()));
    item.insert(
        "created_at".to_string(),
        AttributeValue::N(created_at.to_string()),
    );
    item.insert(
        "payload".to_string(),
        AttributeValue::S(format!("payload-{}", user_id)),
    );
    item
}

fn not_found(operation: &'static str, table: &str) -> MigratorError {
    MigratorError::Service {
        operation,
        table: Some(table.to_string()),
        code: Some("ResourceNotFoundException".to_string()),
        message: "Requested resource not found".to_string(),
    }
}

fn key_of(description: &TableDescription, item: &Item) -> Item {
    description
        .key_schema()
        .iter()
        .filter_map(|k| {
            item.get(k.attribute_name())
                .map(|v| (k.attribute_name().to_string(), v.clone()))
        })
        .collect()
}

impl MemoryStore {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            page_size: 100,
            creating_polls: 0,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Tables created through `create_table` report CREATING for this many DescribeTable calls.
    pub fn with_creating_polls(mut self, polls: usize) -> Self {
        self.creating_polls = polls;
        self
    }

    pub fn insert_table(&self, name: &str, schema: TableSchema) {
        let description = schema.to_description(name).unwrap();
        self.insert_description(name, description);
    }

    /// Store a raw description, e.g. one that lacks a required field.
    pub fn insert_description(&self, name: &str, description: TableDescription) {
        self.inner.lock().unwrap().tables.insert(
            name.to_string(),
            MemoryTable {
                description,
                items: Vec::new(),
                creating_polls_left: 0,
            },
        );
    }

    pub fn insert_item(&self, table: &str, item: Item) {
        let mut inner = self.inner.lock().unwrap();
        let table = inner.tables.get_mut(table).unwrap();
        table.items.push(item);
    }

    pub fn items(&self, table: &str) -> Vec<Item> {
        self.inner
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(|t| t.items.clone())
            .unwrap_or_default()
    }

    pub fn table_names(&self) -> Vec<String> {
        self.inner.lock().unwrap().tables.keys().cloned().collect()
    }

    pub fn fail_puts_into(&self, table: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_puts
            .push(table.to_string());
    }

    /// Every call made so far, formatted `Operation:Table`.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn calls_named(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(':').next() == Some(operation))
            .count()
    }

    fn record(&self, inner: &mut Inner, operation: &str, table: &str) {
        inner.calls.push(format!("{}:{}", operation, table));
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_tables_page(&self, start: Option<String>) -> Result<TableNamesPage> {
        let mut inner = self.inner.lock().unwrap();
        self.record(&mut inner, "ListTables", "");

        let remaining: Vec<String> = inner
            .tables
            .keys()
            .filter(|name| start.as_ref().map_or(true, |s| name.as_str() > s.as_str()))
            .cloned()
            .collect();
        let table_names: Vec<String> = remaining.iter().take(self.page_size).cloned().collect();
        let next_start = if remaining.len() > table_names.len() {
            table_names.last().cloned()
        } else {
            None
        };

        Ok(TableNamesPage {
            table_names,
            next_start,
        })
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription> {
        let mut inner = self.inner.lock().unwrap();
        self.record(&mut inner, "DescribeTable", table_name);

        let table = inner
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found("DescribeTable", table_name))?;

        let mut description = table.description.clone();
        description.table_status = if table.creating_polls_left > 0 {
            table.creating_polls_left -= 1;
            Some(TableStatus::Creating)
        } else {
            Some(TableStatus::Active)
        };
        Ok(description)
    }

    async fn create_table(&self, table_name: &str, schema: &TableSchema) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        self.record(&mut inner, "CreateTable", table_name);

        if inner.tables.contains_key(table_name) {
            return Err(MigratorError::TableCreate {
                table: table_name.to_string(),
                kind: CreateFailure::AlreadyExists(format!(
                    "Table already exists: {}",
                    table_name
                )),
            });
        }

        let description = schema.to_description(table_name)?;
        inner.tables.insert(
            table_name.to_string(),
            MemoryTable {
                description,
                items: Vec::new(),
                creating_polls_left: self.creating_polls,
            },
        );
        Ok(())
    }

    async fn scan_page(&self, table_name: &str, start: Option<Item>) -> Result<ItemsPage> {
        let mut inner = self.inner.lock().unwrap();
        self.record(&mut inner, "Scan", table_name);

        let table = inner
            .tables
            .get(table_name)
            .ok_or_else(|| not_found("Scan", table_name))?;

        let offset = match &start {
            Some(key) => {
                table
                    .items
                    .iter()
                    .position(|i| &key_of(&table.description, i) == key)
                    .map(|p| p + 1)
                    .unwrap_or(table.items.len())
            }
            None => 0,
        };

        let items: Vec<Item> = table
            .items
            .iter()
            .skip(offset)
            .take(self.page_size)
            .cloned()
            .collect();
        let next_start = if offset + items.len() < table.items.len() {
            items.last().map(|i| key_of(&table.description, i))
        } else {
            None
        };

        Ok(ItemsPage { items, next_start })
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        self.record(&mut inner, "PutItem", table_name);

        if inner.failing_puts.iter().any(|t| t == table_name) {
            return Err(MigratorError::Service {
                operation: "PutItem",
                table: Some(table_name.to_string()),
                code: Some("ProvisionedThroughputExceededException".to_string()),
                message: "The level of configured provisioned throughput for the table was exceeded"
                    .to_string(),
            });
        }

        let table = inner
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found("PutItem", table_name))?;

        let key = key_of(&table.description, &item);
        match table
            .items
            .iter()
            .position(|existing| key_of(&table.description, existing) == key)
        {
            Some(pos) => table.items[pos] = item,
            None => table.items.push(item),
        }
        Ok(())
    }
}
