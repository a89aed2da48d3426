// ABOUTME: Library module for ddb-account-migrator
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod dynamodb;
pub mod error;
pub mod filters;
pub mod migration;
pub mod utils;
