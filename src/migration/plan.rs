// ABOUTME: Table-set diffing and per-table migration state tracking
// ABOUTME: Decides which source tables must be created in the destination

use std::collections::HashSet;

/// Where a table is in the migration.
///
/// `Unseen → Diffed → Created → DataCopied` for tables missing in the
/// destination, `Unseen → SkippedExisting → DataCopied` for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Unseen,
    /// Source schema fetched, create pending
    Diffed,
    SkippedExisting,
    Created,
    DataCopied,
}

impl TableState {
    pub fn can_advance_to(self, next: TableState) -> bool {
        use TableState::*;
        matches!(
            (self, next),
            (Unseen, Diffed)
                | (Unseen, SkippedExisting)
                | (Diffed, Created)
                | (SkippedExisting, DataCopied)
                | (Created, DataCopied)
        )
    }
}

/// Progress of one table through a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProgress {
    pub name: String,
    pub state: TableState,
    pub created: bool,
    pub items_copied: usize,
}

impl TableProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: TableState::Unseen,
            created: false,
            items_copied: 0,
        }
    }

    pub fn advance(&mut self, next: TableState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition for '{}': {:?} -> {:?}",
            self.name,
            self.state,
            next
        );
        if next == TableState::Created {
            self.created = true;
        }
        self.state = next;
    }
}

/// Result of diffing the source table set against the destination's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Source tables to migrate, in listing order
    pub source_tables: Vec<String>,
    pub target_tables: Vec<String>,
    /// `source − target`, in source order
    pub missing_tables: Vec<String>,
}

impl MigrationPlan {
    pub fn new(source_tables: Vec<String>, target_tables: Vec<String>) -> Self {
        let existing: HashSet<&str> = target_tables.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let missing_tables = source_tables
            .iter()
            .filter(|t| !existing.contains(t.as_str()) && seen.insert(t.as_str()))
            .cloned()
            .collect();

        Self {
            source_tables,
            target_tables,
            missing_tables,
        }
    }

    /// True when both accounts hold exactly the same table names.
    pub fn sets_equal(&self) -> bool {
        let source: HashSet<&String> = self.source_tables.iter().collect();
        let target: HashSet<&String> = self.target_tables.iter().collect();
        source == target
    }

    pub fn is_missing(&self, table: &str) -> bool {
        self.missing_tables.iter().any(|t| t == table)
    }
}
