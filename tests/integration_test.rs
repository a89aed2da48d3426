// ABOUTME: Integration tests for the full migration workflow
// ABOUTME: Runs commands end-to-end against two DynamoDB-compatible endpoints

use aws_sdk_dynamodb::types::AttributeValue;
use ddb_account_migrator::commands;
use ddb_account_migrator::config::{AccountConfig, CreateWait, MigrationOptions, MigratorConfig};
use ddb_account_migrator::dynamodb::{
    self, AttributeDef, AttributeKind, BillingMode, Item, KeyElement, KeyRole, SchemaProvider,
    TableSchema, Throughput, Writer,
};
use ddb_account_migrator::filters::TableFilter;
use std::env;
use std::time::Duration;

/// Helper to get test endpoints from environment
fn get_test_endpoints() -> Option<(String, String)> {
    let source = env::var("TEST_SOURCE_ENDPOINT").ok()?;
    let target = env::var("TEST_TARGET_ENDPOINT").ok()?;
    Some((source, target))
}

fn account(endpoint: String) -> AccountConfig {
    AccountConfig {
        region: Some("us-east-1".to_string()),
        endpoint_url: Some(endpoint),
        ..Default::default()
    }
}

fn test_config(table: &str) -> MigratorConfig {
    let (source, target) = get_test_endpoints()
        .expect("TEST_SOURCE_ENDPOINT and TEST_TARGET_ENDPOINT must be set");
    MigratorConfig {
        source: account(source),
        target: account(target),
        options: MigrationOptions {
            create_wait: CreateWait::UntilActive {
                timeout: Duration::from_secs(60),
                interval: Duration::from_millis(200),
            },
            filter: TableFilter::new(Some(vec![table.to_string()]), None).unwrap(),
            ..Default::default()
        },
    }
}

fn orders_schema() -> TableSchema {
    TableSchema {
        attribute_definitions: vec![
            AttributeDef {
                name: "customer".to_string(),
                kind: AttributeKind::String,
            },
            AttributeDef {
                name: "order_no".to_string(),
                kind: AttributeKind::Number,
            },
        ],
        key_schema: vec![
            KeyElement {
                attribute_name: "customer".to_string(),
                role: KeyRole::Partition,
            },
            KeyElement {
                attribute_name: "order_no".to_string(),
                role: KeyRole::Sort,
            },
        ],
        provisioned_throughput: Throughput {
            read_capacity_units: 5,
            write_capacity_units: 5,
        },
        billing_mode: BillingMode::Provisioned,
    }
}

fn order(customer: &str, order_no: u32) -> Item {
    Item::from([
        ("customer".to_string(), AttributeValue::S(customer.to_string())),
        ("order_no".to_string(), AttributeValue::N(order_no.to_string())),
        ("total".to_string(), AttributeValue::N(format!("{}.50", order_no))),
    ])
}

/// Seed a table in the source endpoint.
async fn seed_source(config: &MigratorConfig, table: &str, items: u32) {
    let source = dynamodb::connect(&config.source).await.unwrap();
    let writer = Writer::new(&source);
    writer.create_table(table, &orders_schema()).await.unwrap();
    writer
        .wait_for_table(table, config.options.create_wait)
        .await
        .unwrap();
    for n in 0..items {
        writer.put_item(table, order("c1", n)).await.unwrap();
    }
}

fn unique_table_name(prefix: &str) -> String {
    format!("{}_{}", prefix, std::process::id())
}

#[tokio::test]
#[ignore]
async fn test_validate_command_integration() {
    let table = unique_table_name("ValidateIt");
    let config = test_config(&table);
    seed_source(&config, &table, 1).await;

    println!("Testing validate command...");
    let result = commands::validate(&config).await;
    assert!(result.is_ok(), "validate failed: {:?}", result);
}

#[tokio::test]
#[ignore]
async fn test_migrate_then_verify_integration() {
    let table = unique_table_name("MigrateIt");
    let config = test_config(&table);
    seed_source(&config, &table, 30).await;

    println!("Testing migrate command...");
    commands::migrate(&config, false).await.unwrap();

    let target = dynamodb::connect(&config.target).await.unwrap();
    let schema = target.table_schema(&table).await.unwrap();
    assert_eq!(schema.key_schema, orders_schema().key_schema);
    assert_eq!(schema.attribute_definitions, orders_schema().attribute_definitions);

    println!("Testing verify command...");
    let result = commands::verify(&config).await;
    assert!(result.is_ok(), "verify failed: {:?}", result);

    println!("Testing migrate rerun over existing table...");
    let result = commands::migrate(&config, false).await;
    assert!(result.is_ok(), "rerun failed: {:?}", result);
}
