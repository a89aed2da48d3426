// ABOUTME: DynamoDB access layer for one account at a time
// ABOUTME: Exports the session, store traits, schema model, Reader and Writer

pub mod conversions;
#[cfg(test)]
pub(crate) mod memory;
pub mod reader;
pub mod schema;
pub mod session;
pub mod store;
pub mod writer;

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// One DynamoDB item: attribute name to typed value.
pub type Item = HashMap<String, AttributeValue>;

pub use reader::Reader;
pub use schema::{AttributeDef, AttributeKind, BillingMode, KeyElement, KeyRole, TableSchema, Throughput};
pub use session::{connect, DynamoSession};
pub use store::{compare, ItemsPage, SchemaProvider, TableNamesPage, TableStore};
pub use writer::Writer;
