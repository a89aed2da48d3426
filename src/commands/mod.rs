// ABOUTME: Command implementations for each migrator subcommand
// ABOUTME: Exports migrate, validate, and verify commands

pub mod migrate;
pub mod validate;
pub mod verify;

pub use migrate::migrate;
pub use validate::validate;
pub use verify::verify;
