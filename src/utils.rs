// ABOUTME: Utility functions for validation and display
// ABOUTME: Provides DynamoDB table-name checks, log-safe names, and elapsed-time text

use anyhow::{bail, Result};
use std::time::Duration;

/// Validate a DynamoDB table name
///
/// DynamoDB table names are 3 to 255 characters drawn from `a-z`, `A-Z`,
/// `0-9`, `_`, `-` and `.`.
///
/// # Errors
///
/// Returns an error naming the offending rule if the name is empty, too
/// short, too long, or contains a character DynamoDB does not accept.
///
/// # Examples
///
/// ```
/// # use ddb_account_migrator::utils::validate_table_name;
/// assert!(validate_table_name("Users").is_ok());
/// assert!(validate_table_name("orders.v2-prod_eu").is_ok());
/// assert!(validate_table_name("ab").is_err());
/// assert!(validate_table_name("bad name").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Table name cannot be empty");
    }

    let len = name.chars().count();
    if len < 3 {
        bail!("Table name '{}' is shorter than 3 characters", name);
    }
    if len > 255 {
        bail!(
            "Table name '{}...' is longer than 255 characters",
            sanitize_identifier(name)
        );
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        bail!(
            "Table name '{}' contains invalid character {:?}.\n\
             Allowed characters: a-z, A-Z, 0-9, '_', '-', '.'",
            sanitize_identifier(name),
            bad
        );
    }

    Ok(())
}

/// Sanitize a table name for display
///
/// Removes control characters and limits length so names read from a
/// remote account cannot break log lines.
///
/// # Examples
///
/// ```
/// # use ddb_account_migrator::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("Users"), "Users");
/// assert_eq!(sanitize_identifier("Us\ners"), "Users");
/// assert_eq!(sanitize_identifier(&"a".repeat(300)).len(), 100);
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

/// Format an elapsed duration for summaries, e.g. "850ms", "12.4s", "3m 05s".
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        let secs = elapsed.as_secs();
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_name_valid() {
        assert!(validate_table_name("Users").is_ok());
        assert!(validate_table_name("abc").is_ok());
        assert!(validate_table_name("my-table.v1_2024").is_ok());
        assert!(validate_table_name(&"a".repeat(255)).is_ok());
    }

    #[test]
    fn test_validate_table_name_invalid() {
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("   ").is_err());
        assert!(validate_table_name("ab").is_err());
        assert!(validate_table_name(&"a".repeat(256)).is_err());
        assert!(validate_table_name("users/orders").is_err());
        assert!(validate_table_name("tablé").is_err());
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("normal_table"), "normal_table");
        assert_eq!(sanitize_identifier("table\x00name"), "tablename");
        assert_eq!(sanitize_identifier("table\nname"), "tablename");
        assert_eq!(sanitize_identifier(&"a".repeat(200)).len(), 100);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(850)), "850ms");
        assert_eq!(format_elapsed(Duration::from_millis(12_400)), "12.4s");
        assert_eq!(format_elapsed(Duration::from_secs(185)), "3m 05s");
    }
}
