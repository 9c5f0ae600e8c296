//! The store client the engine drives.

use async_trait::async_trait;
use tracing::debug;

use dynoql_model::input::{
    DescribeTableInput, GetItemInput, ListTablesInput, QueryInput, ScanInput, UpdateItemInput,
};
use dynoql_model::output::{
    DescribeTableOutput, GetItemOutput, ListTablesOutput, QueryOutput, ScanOutput,
    UpdateItemOutput,
};
use dynoql_model::{DynamoDBError, DynamoDBOperation};

use crate::error::DynoqlError;

/// Page size for `ListTables` calls.
pub const LIST_TABLES_PAGE_SIZE: i32 = 100;

/// A DynamoDB-compatible store.
///
/// Implementations must be safe to share between statement tasks. Calls are
/// never retried by the engine.
#[async_trait]
pub trait DynamoStore: Send + Sync + std::fmt::Debug {
    /// One page of table names.
    async fn list_tables(&self, input: ListTablesInput) -> Result<ListTablesOutput, DynamoDBError>;

    /// Table metadata.
    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, DynamoDBError>;

    /// One item by full primary key.
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, DynamoDBError>;

    /// One page of items matching a key condition.
    async fn query(&self, input: QueryInput) -> Result<QueryOutput, DynamoDBError>;

    /// One page of a full-table scan.
    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, DynamoDBError>;

    /// Update one item by full primary key.
    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, DynamoDBError>;
}

/// Every table name, following `LastEvaluatedTableName` until exhausted.
///
/// When `prefix` is given only names starting with it are returned.
///
/// # Errors
///
/// Returns [`DynoqlError::StoreCall`] on the first failing page.
pub async fn list_tables(
    store: &dyn DynamoStore,
    prefix: Option<&str>,
) -> Result<Vec<String>, DynoqlError> {
    let mut names = Vec::new();
    let mut cursor = None;
    loop {
        let page = store
            .list_tables(ListTablesInput {
                exclusive_start_table_name: cursor.take(),
                limit: Some(LIST_TABLES_PAGE_SIZE),
            })
            .await
            .map_err(|e| DynoqlError::store(DynamoDBOperation::ListTables, "", e))?;
        debug!(count = page.table_names.len(), "listed table page");

        names.extend(
            page.table_names
                .into_iter()
                .filter(|name| prefix.is_none_or(|p| name.starts_with(p))),
        );
        match page.last_evaluated_table_name {
            Some(last) => cursor = Some(last),
            None => return Ok(names),
        }
    }
}
