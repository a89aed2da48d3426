// ABOUTME: Typed error taxonomy for DynamoDB account migration
// ABOUTME: Maps AWS SDK failures onto schema, create, and service error kinds

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for the DynamoDB and orchestration layers.
pub type Result<T> = std::result::Result<T, MigratorError>;

/// Why a destination table could not be created. Each kind keeps the
/// service's own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateFailure {
    /// The destination already has a table with this name.
    AlreadyExists(String),
    /// Malformed schema, quota exceeded, access denied, ...
    Rejected(String),
}

impl std::fmt::Display for CreateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateFailure::AlreadyExists(message) => {
                write!(f, "table already exists: {}", message)
            }
            CreateFailure::Rejected(message) => write!(f, "{}", message),
        }
    }
}

/// Errors that can occur while reading from or writing to an account.
#[derive(Error, Debug)]
pub enum MigratorError {
    #[error("Table '{table}' description is missing required field '{field}'")]
    SchemaFieldMissing { table: String, field: &'static str },

    #[error("Table '{table}' has an unsupported schema: {reason}")]
    InvalidSchema { table: String, reason: String },

    #[error("Failed to create table '{table}': {kind}")]
    TableCreate { table: String, kind: CreateFailure },

    #[error("Table '{table}' did not become ACTIVE within {waited:?}")]
    TableNotReady { table: String, waited: Duration },

    #[error("{operation} failed{}: {message}", table_suffix(.table))]
    Service {
        operation: &'static str,
        table: Option<String>,
        code: Option<String>,
        message: String,
    },
}

fn table_suffix(table: &Option<String>) -> String {
    match table {
        Some(t) => format!(" for table '{}'", t),
        None => String::new(),
    }
}

impl MigratorError {
    /// Wrap an SDK failure for `operation`, keeping the service error code if present.
    pub fn service<E, R>(operation: &'static str, table: Option<&str>, err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        let code = err.code().map(str::to_string);
        MigratorError::Service {
            operation,
            table: table.map(str::to_string),
            code,
            message: DisplayErrorContext(&err).to_string(),
        }
    }

    /// Classify a CreateTable failure. `ResourceInUseException` means the
    /// name is taken; everything else is a rejection.
    pub fn table_create<R>(table: &str, err: SdkError<CreateTableError, R>) -> Self
    where
        R: std::fmt::Debug,
    {
        let message = DisplayErrorContext(&err).to_string();
        let kind = match err.as_service_error() {
            Some(e) if e.is_resource_in_use_exception() => CreateFailure::AlreadyExists(message),
            _ => CreateFailure::Rejected(message),
        };
        MigratorError::TableCreate {
            table: table.to_string(),
            kind,
        }
    }

    /// True when a create failed only because the table is already there.
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            MigratorError::TableCreate {
                kind: CreateFailure::AlreadyExists(_),
                ..
            }
        )
    }

    /// Service error code reported by DynamoDB, e.g. `ResourceNotFoundException`.
    pub fn service_code(&self) -> Option<&str> {
        match self {
            MigratorError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
