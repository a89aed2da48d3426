// ABOUTME: Parses the migrator configuration file for source and target accounts
// ABOUTME: Converts TOML into MigratorConfig with validated migration options

use crate::filters::TableFilter;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "ddb-migrator.toml";
pub const DEFAULT_CREATE_DELAY_SECS: u64 = 20;
pub const DEFAULT_ACTIVE_TIMEOUT_SECS: u64 = 300;

/// Connection settings for one AWS account.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    /// Named profile from ~/.aws/config and ~/.aws/credentials
    pub profile: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint (DynamoDB Local, LocalStack)
    pub endpoint_url: Option<String>,
    /// Attempts for the SDK's standard retry strategy
    pub max_attempts: Option<u32>,
}

impl AccountConfig {
    /// Short description used in log lines.
    pub fn display(&self) -> String {
        let who = self.profile.as_deref().unwrap_or("default credentials");
        match (&self.endpoint_url, &self.region) {
            (Some(url), _) => format!("{} @ {}", who, url),
            (None, Some(region)) => format!("{} ({})", who, region),
            (None, None) => who.to_string(),
        }
    }

    fn validate(&self, role: &str) -> Result<()> {
        if self.profile.is_none() && self.region.is_none() && self.endpoint_url.is_none() {
            bail!(
                "[{}] must set at least one of 'profile', 'region' or 'endpoint_url'",
                role
            );
        }
        if let Some(profile) = &self.profile {
            if profile.trim().is_empty() {
                bail!("[{}] profile cannot be empty", role);
            }
        }
        if let Some(url) = &self.endpoint_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!(
                    "[{}] endpoint_url must start with http:// or https://, got '{}'",
                    role,
                    url
                );
            }
        }
        if self.max_attempts == Some(0) {
            bail!("[{}] max_attempts must be at least 1", role);
        }
        Ok(())
    }
}

/// How much of a paginated listing or scan to read.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Pagination {
    /// Follow continuation tokens until exhausted
    #[default]
    All,
    /// Only the first page the service returns
    SinglePage,
}

/// What to do after issuing CreateTable before touching the new table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateWait {
    /// Sleep unconditionally.
    Fixed(Duration),
    /// Poll DescribeTable until the table reports ACTIVE.
    UntilActive { timeout: Duration, interval: Duration },
}

impl Default for CreateWait {
    fn default() -> Self {
        CreateWait::Fixed(Duration::from_secs(DEFAULT_CREATE_DELAY_SECS))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct MigrationSection {
    #[serde(default = "default_create_delay")]
    create_delay_secs: u64,
    #[serde(default)]
    wait_for_active: bool,
    #[serde(default = "default_active_timeout")]
    active_timeout_secs: u64,
    #[serde(default)]
    pagination: Pagination,
    include_tables: Option<Vec<String>>,
    exclude_tables: Option<Vec<String>>,
}

impl Default for MigrationSection {
    fn default() -> Self {
        Self {
            create_delay_secs: DEFAULT_CREATE_DELAY_SECS,
            wait_for_active: false,
            active_timeout_secs: DEFAULT_ACTIVE_TIMEOUT_SECS,
            pagination: Pagination::All,
            include_tables: None,
            exclude_tables: None,
        }
    }
}

fn default_create_delay() -> u64 {
    DEFAULT_CREATE_DELAY_SECS
}

fn default_active_timeout() -> u64 {
    DEFAULT_ACTIVE_TIMEOUT_SECS
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    source: AccountConfig,
    target: AccountConfig,
    #[serde(default)]
    migration: MigrationSection,
}

/// Options that shape a migration run.
#[derive(Debug, Clone, Default)]
pub struct MigrationOptions {
    pub create_wait: CreateWait,
    pub pagination: Pagination,
    pub filter: TableFilter,
}

/// Everything the migrator needs, injected into commands at startup.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    pub source: AccountConfig,
    pub target: AccountConfig,
    pub options: MigrationOptions,
}

impl MigratorConfig {
    /// Parse and validate configuration text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let parsed: RawConfig = toml::from_str(raw).context("Failed to parse TOML config")?;

        parsed.source.validate("source")?;
        parsed.target.validate("target")?;

        let migration = parsed.migration;
        let create_wait = if migration.wait_for_active {
            if migration.active_timeout_secs == 0 {
                bail!("[migration] active_timeout_secs must be greater than 0");
            }
            CreateWait::UntilActive {
                timeout: Duration::from_secs(migration.active_timeout_secs),
                interval: Duration::from_secs(2),
            }
        } else {
            CreateWait::Fixed(Duration::from_secs(migration.create_delay_secs))
        };

        let filter = TableFilter::new(migration.include_tables, migration.exclude_tables)?;

        Ok(Self {
            source: parsed.source,
            target: parsed.target,
            options: MigrationOptions {
                create_wait,
                pagination: migration.pagination,
                filter,
            },
        })
    }
}

/// Load the migrator configuration from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> Result<MigratorConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    MigratorConfig::from_toml_str(&raw)
        .with_context(|| format!("Invalid config file at {}", path.display()))
}
