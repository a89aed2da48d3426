// ABOUTME: CLI entry point for ddb-account-migrator
// ABOUTME: Parses commands, loads the config file, and routes to handlers

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ddb_account_migrator::commands;
use ddb_account_migrator::config::{load_config, MigratorConfig, DEFAULT_CONFIG_PATH};
use ddb_account_migrator::filters::TableFilter;

#[derive(Parser)]
#[command(name = "ddb-account-migrator")]
#[command(about = "Copy DynamoDB tables and items from one AWS account to another", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ConfigArgs {
    /// Path to the migrator TOML config describing source and target accounts
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Include only these tables (comma-separated); overrides the config file
    #[arg(long, value_delimiter = ',')]
    include_tables: Option<Vec<String>>,
    /// Exclude these tables (comma-separated); overrides the config file
    #[arg(long, value_delimiter = ',')]
    exclude_tables: Option<Vec<String>>,
}

impl ConfigArgs {
    fn load(self) -> anyhow::Result<MigratorConfig> {
        let mut config = load_config(&self.config)?;
        if self.include_tables.is_some() || self.exclude_tables.is_some() {
            config.options.filter = TableFilter::new(self.include_tables, self.exclude_tables)
                .context("Invalid table filter arguments")?;
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create missing tables in the target account and copy every item
    Migrate {
        #[command(flatten)]
        args: ConfigArgs,
        /// Only report which tables would be created and copied
        #[arg(long)]
        dry_run: bool,
    },
    /// Check that both accounts are reachable and list what would migrate
    Validate {
        #[command(flatten)]
        args: ConfigArgs,
    },
    /// Compare item checksums between source and target tables
    Verify {
        #[command(flatten)]
        args: ConfigArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate { args, dry_run } => {
            let config = args.load()?;
            commands::migrate(&config, dry_run).await
        }
        Commands::Validate { args } => {
            let config = args.load()?;
            commands::validate(&config).await
        }
        Commands::Verify { args } => {
            let config = args.load()?;
            commands::verify(&config).await
        }
    }
}
