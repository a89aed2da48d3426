// ABOUTME: DynamoDB account handle built from an AccountConfig
// ABOUTME: Issues the raw ListTables/DescribeTable/CreateTable/Scan/PutItem calls

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::types::TableDescription;
use aws_sdk_dynamodb::Client;

use super::schema::TableSchema;
use super::store::{ItemsPage, TableNamesPage, TableStore};
use super::Item;
use crate::config::AccountConfig;
use crate::error::{MigratorError, Result};

/// One account's DynamoDB endpoint.
///
/// Each session owns an independent SDK client; sessions never share state.
#[derive(Debug, Clone)]
pub struct DynamoSession {
    client: Client,
    label: String,
}

impl DynamoSession {
    /// Wrap an already configured SDK client.
    pub fn new(client: Client, label: impl Into<String>) -> Self {
        Self {
            client,
            label: label.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Build a session for one account
///
/// Region priority: `region` setting > profile/environment > `us-east-1`.
/// Credentials come from the named profile when set, otherwise from the
/// default chain (environment variables, SSO, instance profile, ...).
/// Retries are left to the SDK's standard strategy, optionally with a
/// custom attempt count.
///
/// Building the client performs no network call; use
/// [`DynamoSession::ping`] to check reachability.
pub async fn connect(account: &AccountConfig) -> Result<DynamoSession> {
    let region_provider = RegionProviderChain::first_try(account.region.clone().map(Region::new))
        .or_default_provider()
        .or_else("us-east-1");

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    if let Some(profile) = &account.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(max_attempts) = account.max_attempts {
        loader = loader.retry_config(RetryConfig::standard().with_max_attempts(max_attempts));
    }

    let sdk_config = loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(url) = &account.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    let label = account.display();
    tracing::debug!("Built DynamoDB client for {}", label);

    Ok(DynamoSession::new(
        Client::from_conf(dynamo_config.build()),
        label,
    ))
}

impl DynamoSession {
    /// Make a one-item ListTables call to verify connectivity and credentials.
    pub async fn ping(&self) -> Result<()> {
        self.client
            .list_tables()
            .limit(1)
            .send()
            .await
            .map_err(|e| MigratorError::service("ListTables", None, e))?;
        Ok(())
    }
}

#[async_trait]
impl TableStore for DynamoSession {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_tables_page(&self, start: Option<String>) -> Result<TableNamesPage> {
        let output = self
            .client
            .list_tables()
            .set_exclusive_start_table_name(start)
            .send()
            .await
            .map_err(|e| MigratorError::service("ListTables", None, e))?;

        Ok(TableNamesPage {
            table_names: output.table_names.unwrap_or_default(),
            next_start: output.last_evaluated_table_name,
        })
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription> {
        let output = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| MigratorError::service("DescribeTable", Some(table_name), e))?;

        output.table.ok_or(MigratorError::SchemaFieldMissing {
            table: table_name.to_string(),
            field: "Table",
        })
    }

    async fn create_table(&self, table_name: &str, schema: &TableSchema) -> Result<()> {
        let request = self
            .client
            .create_table()
            .table_name(table_name)
            .set_attribute_definitions(Some(schema.sdk_attribute_definitions(table_name)?))
            .set_key_schema(Some(schema.sdk_key_schema(table_name)?))
            .set_provisioned_throughput(schema.sdk_provisioned_throughput(table_name)?)
            .billing_mode(schema.sdk_billing_mode());

        request
            .send()
            .await
            .map_err(|e| MigratorError::table_create(table_name, e))?;
        Ok(())
    }

    async fn scan_page(&self, table_name: &str, start: Option<Item>) -> Result<ItemsPage> {
        let output = self
            .client
            .scan()
            .table_name(table_name)
            .set_exclusive_start_key(start)
            .send()
            .await
            .map_err(|e| MigratorError::service("Scan", Some(table_name), e))?;

        Ok(ItemsPage {
            items: output.items.unwrap_or_default(),
            next_start: output.last_evaluated_key,
        })
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| MigratorError::service("PutItem", Some(table_name), e))?;
        Ok(())
    }
}
