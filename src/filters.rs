// ABOUTME: Include/exclude filtering of source tables for selective migration
// ABOUTME: Validates table names and narrows the set of tables to copy

use crate::utils::validate_table_name;
use anyhow::{bail, Context, Result};

/// Represents table filtering rules
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    include_tables: Option<Vec<String>>,
    exclude_tables: Option<Vec<String>>,
}

impl TableFilter {
    /// Creates a filter from configuration lists
    pub fn new(
        include_tables: Option<Vec<String>>,
        exclude_tables: Option<Vec<String>>,
    ) -> Result<Self> {
        if include_tables.is_some() && exclude_tables.is_some() {
            bail!("Cannot use both include_tables and exclude_tables");
        }

        for table in include_tables.iter().chain(exclude_tables.iter()).flatten() {
            validate_table_name(table)
                .with_context(|| format!("Invalid table name in filter: '{}'", table))?;
        }

        Ok(Self {
            include_tables,
            exclude_tables,
        })
    }

    /// Creates an empty filter (migrate everything)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Checks if any filters are active
    pub fn is_empty(&self) -> bool {
        self.include_tables.is_none() && self.exclude_tables.is_none()
    }

    /// Determines if a table should be migrated
    pub fn should_migrate(&self, table_name: &str) -> bool {
        if let Some(ref include) = self.include_tables {
            if !include.iter().any(|t| t == table_name) {
                return false;
            }
        }

        if let Some(ref exclude) = self.exclude_tables {
            if exclude.iter().any(|t| t == table_name) {
                return false;
            }
        }

        true
    }

    /// Keeps only the tables that pass the filter, preserving order
    pub fn apply(&self, tables: Vec<String>) -> Vec<String> {
        let before = tables.len();
        let kept: Vec<String> = tables
            .into_iter()
            .filter(|t| self.should_migrate(t))
            .collect();
        if kept.len() != before {
            tracing::info!(
                "Table filter excluded {} of {} table(s)",
                before - kept.len(),
                before
            );
        }
        kept
    }
}
