// ABOUTME: Table enumeration and item retrieval for one account
// ABOUTME: Layers pagination over the store's single-page ListTables and Scan calls

use super::store::TableStore;
use super::Item;
use crate::config::Pagination;
use crate::error::Result;

/// Reads table names and items from one account.
pub struct Reader<'a, S: TableStore + ?Sized> {
    store: &'a S,
    pagination: Pagination,
}

impl<'a, S: TableStore + ?Sized> Reader<'a, S> {
    pub fn new(store: &'a S, pagination: Pagination) -> Self {
        Self { store, pagination }
    }

    /// List all table names in the account, in the order DynamoDB returns them.
    ///
    /// With [`Pagination::SinglePage`] only the first page is returned.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let mut tables = Vec::new();
        let mut start = None;

        loop {
            let page = self.store.list_tables_page(start).await?;
            tables.extend(page.table_names);

            match (self.pagination, page.next_start) {
                (Pagination::All, Some(next)) => start = Some(next),
                (Pagination::SinglePage, Some(_)) => {
                    tracing::warn!(
                        "⚠ {} has more tables than the first page; single_page pagination stops here",
                        self.store.label()
                    );
                    break;
                }
                (_, None) => break,
            }
        }

        tracing::debug!("Found {} table(s) in {}", tables.len(), self.store.label());
        Ok(tables)
    }

    /// Retrieve every item currently in `table_name`.
    ///
    /// # Errors
    ///
    /// Propagates the service error unchanged, e.g. when the table does not
    /// exist or access is denied.
    pub async fn scan_table(&self, table_name: &str) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start = None;
        let mut pages = 0usize;

        loop {
            let page = self.store.scan_page(table_name, start).await?;
            pages += 1;
            items.extend(page.items);

            match (self.pagination, page.next_start) {
                (Pagination::All, Some(next)) => start = Some(next),
                (Pagination::SinglePage, Some(_)) => {
                    tracing::warn!(
                        "⚠ Table '{}' has more items than one scan page; single_page pagination stops here",
                        table_name
                    );
                    break;
                }
                (_, None) => break,
            }
        }

        tracing::debug!(
            "Scanned {} item(s) from '{}' in {} page(s)",
            items.len(),
            table_name,
            pages
        );
        Ok(items)
    }
}
