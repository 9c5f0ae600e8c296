//! [`DynamoStore`] over the AWS SDK client.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::Client;
use tracing::{debug, info};

use dynoql_core::DynamoStore;
use dynoql_model::input::{
    DescribeTableInput, GetItemInput, ListTablesInput, QueryInput, ScanInput, UpdateItemInput,
};
use dynoql_model::output::{
    DescribeTableOutput, GetItemOutput, ListTablesOutput, QueryOutput, ScanOutput,
    UpdateItemOutput,
};
use dynoql_model::DynamoDBError;

use crate::config::{AwsStoreConfig, AwsStoreError};
use crate::convert::{
    from_sdk_error, from_sdk_item, from_sdk_table, non_empty, to_sdk_item, to_sdk_return_value,
};

/// Provider name reported for static credentials.
const CREDENTIALS_PROVIDER: &str = "dynoql-static";

/// Store backed by a live DynamoDB endpoint.
#[derive(Debug, Clone)]
pub struct AwsDynamoStore {
    client: Client,
}

impl AwsDynamoStore {
    /// Build an SDK session from `config`.
    ///
    /// Unset fields fall back to the SDK's default provider chains.
    ///
    /// # Errors
    ///
    /// Fails when credentials are half configured or no region resolves.
    pub async fn connect(config: &AwsStoreConfig) -> Result<Self, AwsStoreError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some((id, secret)) = config.static_credentials()? {
            loader = loader.credentials_provider(Credentials::new(
                id,
                secret,
                None,
                None,
                CREDENTIALS_PROVIDER,
            ));
        }
        if let Some(url) = &config.endpoint_url {
            loader = loader.endpoint_url(url);
        }

        let sdk_config = loader.load().await;
        let Some(region) = sdk_config.region() else {
            return Err(AwsStoreError::MissingRegion);
        };
        info!(
            region = %region,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "connected to DynamoDB"
        );
        Ok(Self::from_client(Client::new(&sdk_config)))
    }

    /// Wrap an already configured client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DynamoStore for AwsDynamoStore {
    async fn list_tables(&self, input: ListTablesInput) -> Result<ListTablesOutput, DynamoDBError> {
        let out = self
            .client
            .list_tables()
            .set_exclusive_start_table_name(input.exclusive_start_table_name)
            .set_limit(input.limit)
            .send()
            .await
            .map_err(from_sdk_error)?;
        Ok(ListTablesOutput {
            table_names: out.table_names.unwrap_or_default(),
            last_evaluated_table_name: out.last_evaluated_table_name,
        })
    }

    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, DynamoDBError> {
        debug!(table = %input.table_name, "DescribeTable");
        let out = self
            .client
            .describe_table()
            .table_name(input.table_name)
            .send()
            .await
            .map_err(from_sdk_error)?;
        Ok(DescribeTableOutput {
            table: out.table.as_ref().map(from_sdk_table),
        })
    }

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, DynamoDBError> {
        debug!(table = %input.table_name, "GetItem");
        let out = self
            .client
            .get_item()
            .table_name(input.table_name)
            .set_key(Some(to_sdk_item(input.key)))
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .send()
            .await
            .map_err(from_sdk_error)?;
        Ok(GetItemOutput {
            item: out.item.map(from_sdk_item),
        })
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, DynamoDBError> {
        debug!(
            table = %input.table_name,
            index = input.index_name.as_deref().unwrap_or("-"),
            "Query"
        );
        let out = self
            .client
            .query()
            .table_name(input.table_name)
            .set_index_name(input.index_name)
            .set_key_condition_expression(input.key_condition_expression)
            .set_filter_expression(input.filter_expression)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_expression_attribute_values(non_empty(to_sdk_item(
                input.expression_attribute_values,
            )))
            .set_limit(input.limit)
            .set_exclusive_start_key(non_empty(to_sdk_item(input.exclusive_start_key)))
            .send()
            .await
            .map_err(from_sdk_error)?;
        Ok(QueryOutput {
            items: out
                .items
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_item)
                .collect(),
            count: out.count,
            scanned_count: out.scanned_count,
            last_evaluated_key: out.last_evaluated_key.map(from_sdk_item).unwrap_or_default(),
        })
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, DynamoDBError> {
        debug!(table = %input.table_name, limit = ?input.limit, "Scan");
        let out = self
            .client
            .scan()
            .table_name(input.table_name)
            .set_filter_expression(input.filter_expression)
            .set_projection_expression(input.projection_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_expression_attribute_values(non_empty(to_sdk_item(
                input.expression_attribute_values,
            )))
            .set_limit(input.limit)
            .set_exclusive_start_key(non_empty(to_sdk_item(input.exclusive_start_key)))
            .send()
            .await
            .map_err(from_sdk_error)?;
        Ok(ScanOutput {
            items: out
                .items
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_item)
                .collect(),
            count: out.count,
            scanned_count: out.scanned_count,
            last_evaluated_key: out.last_evaluated_key.map(from_sdk_item).unwrap_or_default(),
        })
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, DynamoDBError> {
        debug!(table = %input.table_name, "UpdateItem");
        let out = self
            .client
            .update_item()
            .table_name(input.table_name)
            .set_key(Some(to_sdk_item(input.key)))
            .set_update_expression(input.update_expression)
            .set_condition_expression(input.condition_expression)
            .set_expression_attribute_names(non_empty(input.expression_attribute_names))
            .set_expression_attribute_values(non_empty(to_sdk_item(
                input.expression_attribute_values,
            )))
            .set_return_values(input.return_values.map(to_sdk_return_value))
            .send()
            .await
            .map_err(from_sdk_error)?;
        Ok(UpdateItemOutput {
            attributes: out.attributes.map(from_sdk_item).unwrap_or_default(),
        })
    }
}
