// ABOUTME: Item copy from a source table into the same-named destination table
// ABOUTME: Scans the source, then writes items one PutItem at a time

use crate::dynamodb::{Reader, TableStore, Writer};
use crate::error::Result;

/// Copy every item of `table` from source to destination
///
/// Items are written unchanged, one `PutItem` per item, in scan order. A
/// put overwrites any destination item with the same key, so repeating a
/// copy does not duplicate data.
///
/// # Returns
///
/// Number of items written.
///
/// # Errors
///
/// The first scan or put failure is returned unchanged; items already
/// written stay in the destination.
pub async fn copy_table_items<S, T>(
    reader: &Reader<'_, S>,
    writer: &Writer<'_, T>,
    table: &str,
) -> Result<usize>
where
    S: TableStore + ?Sized,
    T: TableStore + ?Sized,
{
    tracing::info!("*** Exporting data from: {}", table);
    let items = reader.scan_table(table).await?;

    tracing::info!("*** Uploading data to: {}", table);
    let count = items.len();
    for item in items {
        writer.put_item(table, item).await?;
    }

    tracing::info!("Uploaded {} item(s) into table {}", count, table);
    Ok(count)
}
