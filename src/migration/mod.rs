// ABOUTME: Migration module
// ABOUTME: Handles table-set diffing, table creation, item copy, and verification checksums

pub mod checksum;
pub mod copy;
pub mod orchestrator;
pub mod plan;

pub use checksum::{compare_tables, compute_items_checksum, compute_table_checksum, ChecksumResult};
pub use copy::copy_table_items;
pub use orchestrator::{MigrationReport, Orchestrator};
pub use plan::{MigrationPlan, TableProgress, TableState};
