// ABOUTME: Data validation utilities using checksums over scanned items
// ABOUTME: Computes and compares table checksums for post-migration verification

use sha2::{Digest, Sha256};

use crate::dynamodb::conversions::canonical_item;
use crate::dynamodb::{Item, Reader, TableStore};
use crate::error::Result;

/// Result of a checksum comparison between source and target tables
#[derive(Debug, Clone, PartialEq)]
pub struct ChecksumResult {
    pub table: String,
    pub source_checksum: String,
    pub target_checksum: String,
    pub source_item_count: usize,
    pub target_item_count: usize,
    pub matches: bool,
}

impl ChecksumResult {
    /// Returns true if both checksums and item counts match
    pub fn is_valid(&self) -> bool {
        self.matches && self.source_item_count == self.target_item_count
    }
}

/// Compute a checksum over a set of items
///
/// Each item is rendered as canonical DynamoDB JSON (sorted attribute
/// names, sorted set members), the rendered lines are sorted so scan order
/// does not matter, and the SHA-256 of the joined lines is returned as hex.
/// An empty table yields `"empty"`.
pub fn compute_items_checksum(items: &[Item]) -> String {
    if items.is_empty() {
        return "empty".to_string();
    }

    let mut lines: Vec<String> = items.iter().map(canonical_item).collect();
    lines.sort();

    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Scan a table and compute its checksum and item count
pub async fn compute_table_checksum<S: TableStore + ?Sized>(
    reader: &Reader<'_, S>,
    table: &str,
) -> Result<(String, usize)> {
    tracing::debug!("Computing checksum for {}", table);

    let items = reader.scan_table(table).await?;
    let checksum = compute_items_checksum(&items);

    tracing::debug!(
        "Checksum for {}: {} ({} items)",
        table,
        checksum,
        items.len()
    );

    Ok((checksum, items.len()))
}

/// Compare a table between source and target accounts
pub async fn compare_tables<S, T>(
    source: &Reader<'_, S>,
    target: &Reader<'_, T>,
    table: &str,
) -> Result<ChecksumResult>
where
    S: TableStore + ?Sized,
    T: TableStore + ?Sized,
{
    tracing::debug!("Comparing table {}", table);

    let source_future = compute_table_checksum(source, table);
    let target_future = compute_table_checksum(target, table);

    let (source_result, target_result) = tokio::try_join!(source_future, target_future)?;

    let (source_checksum, source_item_count) = source_result;
    let (target_checksum, target_item_count) = target_result;

    let matches = source_checksum == target_checksum;

    Ok(ChecksumResult {
        table: table.to_string(),
        source_checksum,
        target_checksum,
        source_item_count,
        target_item_count,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pagination;
    use crate::dynamodb::memory::{item, MemoryStore};
    use crate::dynamodb::schema::tests::users_schema;
    use aws_sdk_dynamodb::types::AttributeValue;

    #[test]
    fn test_checksum_ignores_item_order() {
        let a = vec![item("u1", 1), item("u2", 2)];
        let b = vec![item("u2", 2), item("u1", 1)];
        assert_eq!(compute_items_checksum(&a), compute_items_checksum(&b));
        assert_eq!(compute_items_checksum(&a).len(), 64);
    }

    #[test]
    fn test_checksum_detects_changed_value() {
        let a = vec![item("u1", 1)];
        let mut changed = item("u1", 1);
        changed.insert("payload".to_string(), AttributeValue::S("other".to_string()));
        assert_ne!(compute_items_checksum(&a), compute_items_checksum(&[changed]));
    }

    #[test]
    fn test_empty_checksum() {
        assert_eq!(compute_items_checksum(&[]), "empty");
    }

    #[tokio::test]
    async fn test_compare_tables() {
        let source = MemoryStore::new("source");
        let target = MemoryStore::new("target");
        source.insert_table("Users", users_schema());
        target.insert_table("Users", users_schema());
        source.insert_item("Users", item("u1", 1));
        source.insert_item("Users", item("u2", 2));
        target.insert_item("Users", item("u2", 2));
        target.insert_item("Users", item("u1", 1));

        let source_reader = Reader::new(&source, Pagination::All);
        let target_reader = Reader::new(&target, Pagination::All);

        let result = compare_tables(&source_reader, &target_reader, "Users")
            .await
            .unwrap();
        assert!(result.is_valid());
        assert_eq!(result.table, "Users");
        assert_eq!(result.source_item_count, 2);

        target.insert_item("Users", item("u3", 3));
        let result = compare_tables(&source_reader, &target_reader, "Users")
            .await
            .unwrap();
        assert!(!result.matches);
        assert!(!result.is_valid());
        assert_eq!(result.target_item_count, 3);
    }
}
