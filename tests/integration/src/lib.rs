//! Integration tests for dynoql against a DynamoDB-compatible endpoint.
//!
//! These tests create real tables, so they need a running endpoint at
//! `localhost:4566` (or `DYNOQL_ENDPOINT_URL`). They are marked `#[ignore]`
//! so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p dynoql-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use anyhow::{Context, Result};
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode, GlobalSecondaryIndex, KeySchemaElement,
    KeyType, Projection, ProjectionType, ScalarAttributeType,
};
use tracing::info;

use dynoql_aws::AwsDynamoStore;
use dynoql_core::{Dispatcher, DynoqlConfig};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the store.
fn endpoint_url() -> String {
    std::env::var("DYNOQL_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Create a DynamoDB client pointing at the local endpoint.
#[must_use]
pub fn dynamodb_client() -> aws_sdk_dynamodb::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_dynamodb::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .build();

    aws_sdk_dynamodb::Client::from_conf(config)
}

/// A dispatcher over the same endpoint as [`dynamodb_client`].
#[must_use]
pub fn dispatcher(client: &aws_sdk_dynamodb::Client) -> Dispatcher {
    let store = Arc::new(AwsDynamoStore::from_client(client.clone()));
    Dispatcher::new(store, &DynoqlConfig::default())
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("dynoql-{prefix}-{id}")
}

fn key(name: &str, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(key_type)
        .build()
        .context("invalid key schema element")
}

fn attribute(name: &str, kind: ScalarAttributeType) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(kind)
        .build()
        .context("invalid attribute definition")
}

/// Create a `user` style table: numeric hash key `id` and a global index
/// `category-index` on the string attribute `category`.
pub async fn create_user_table(client: &aws_sdk_dynamodb::Client, table: &str) -> Result<()> {
    let index = GlobalSecondaryIndex::builder()
        .index_name("category-index")
        .key_schema(key("category", KeyType::Hash)?)
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .build()
        .context("invalid global secondary index")?;

    client
        .create_table()
        .table_name(table)
        .key_schema(key("id", KeyType::Hash)?)
        .attribute_definitions(attribute("id", ScalarAttributeType::N)?)
        .attribute_definitions(attribute("category", ScalarAttributeType::S)?)
        .global_secondary_indexes(index)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .with_context(|| format!("failed to create table {table}"))?;
    info!(table, "created user table");
    Ok(())
}

/// Create an `event` style table: string hash key `pk`, numeric range key `sk`.
pub async fn create_event_table(client: &aws_sdk_dynamodb::Client, table: &str) -> Result<()> {
    client
        .create_table()
        .table_name(table)
        .key_schema(key("pk", KeyType::Hash)?)
        .key_schema(key("sk", KeyType::Range)?)
        .attribute_definitions(attribute("pk", ScalarAttributeType::S)?)
        .attribute_definitions(attribute("sk", ScalarAttributeType::N)?)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .with_context(|| format!("failed to create table {table}"))?;
    info!(table, "created event table");
    Ok(())
}

/// Put one item built from `(name, value)` pairs.
pub async fn put(
    client: &aws_sdk_dynamodb::Client,
    table: &str,
    attributes: &[(&str, AttributeValue)],
) -> Result<()> {
    let mut request = client.put_item().table_name(table);
    for (name, value) in attributes {
        request = request.item(*name, value.clone());
    }
    request
        .send()
        .await
        .with_context(|| format!("failed to put item into {table}"))?;
    Ok(())
}

/// Numeric attribute.
#[must_use]
pub fn n(value: i64) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

/// String attribute.
#[must_use]
pub fn s(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_owned())
}

/// Delete a table, ignoring errors.
pub async fn cleanup_table(client: &aws_sdk_dynamodb::Client, table: &str) {
    let _ = client.delete_table().table_name(table).send().await;
}

mod test_statements;
