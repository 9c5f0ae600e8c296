//! Scripted in-memory store for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use dynoql_model::input::{
    DescribeTableInput, GetItemInput, ListTablesInput, QueryInput, ScanInput, UpdateItemInput,
};
use dynoql_model::output::{
    DescribeTableOutput, GetItemOutput, ListTablesOutput, QueryOutput, ScanOutput,
    UpdateItemOutput,
};
use dynoql_model::types::{KeySchemaElement, SecondaryIndexDescription, TableDescription};
use dynoql_model::{AttributeValue, DynamoDBError, Item};

use crate::store::DynamoStore;

/// A request the store received.
#[derive(Debug, Clone)]
pub(crate) enum Recorded {
    ListTables(ListTablesInput),
    DescribeTable(DescribeTableInput),
    GetItem(GetItemInput),
    Query(QueryInput),
    Scan(ScanInput),
    UpdateItem(UpdateItemInput),
}

type Queue<T> = Mutex<VecDeque<Result<T, DynamoDBError>>>;

/// Records every request and answers from queued responses.
///
/// `DescribeTable` answers from the registered tables. Other calls pop their
/// queue and fall back to an empty response once it runs dry.
#[derive(Debug, Default)]
pub(crate) struct ScriptedStore {
    tables: Mutex<HashMap<String, TableDescription>>,
    list_tables: Queue<ListTablesOutput>,
    get_items: Queue<GetItemOutput>,
    queries: Queue<QueryOutput>,
    scans: Queue<ScanOutput>,
    updates: Queue<UpdateItemOutput>,
    calls: Mutex<Vec<Recorded>>,
    stalled: AtomicBool,
}

impl ScriptedStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_table(&self, description: TableDescription) {
        let name = description.table_name.clone().unwrap_or_default();
        self.tables.lock().insert(name, description);
    }

    pub(crate) fn push_list_tables(&self, response: Result<ListTablesOutput, DynamoDBError>) {
        self.list_tables.lock().push_back(response);
    }

    pub(crate) fn push_get_item(&self, response: Result<GetItemOutput, DynamoDBError>) {
        self.get_items.lock().push_back(response);
    }

    pub(crate) fn push_query(&self, response: Result<QueryOutput, DynamoDBError>) {
        self.queries.lock().push_back(response);
    }

    pub(crate) fn push_scan(&self, response: Result<ScanOutput, DynamoDBError>) {
        self.scans.lock().push_back(response);
    }

    pub(crate) fn push_update(&self, response: Result<UpdateItemOutput, DynamoDBError>) {
        self.updates.lock().push_back(response);
    }

    /// Make every later call hang after being recorded.
    pub(crate) fn stall(&self) {
        self.stalled.store(true, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().clone()
    }

    async fn record(&self, call: Recorded) {
        self.calls.lock().push(call);
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

fn pop<T: Default>(queue: &Queue<T>) -> Result<T, DynamoDBError> {
    queue.lock().pop_front().unwrap_or_else(|| Ok(T::default()))
}

#[async_trait]
impl DynamoStore for ScriptedStore {
    async fn list_tables(&self, input: ListTablesInput) -> Result<ListTablesOutput, DynamoDBError> {
        self.record(Recorded::ListTables(input)).await;
        pop(&self.list_tables)
    }

    async fn describe_table(
        &self,
        input: DescribeTableInput,
    ) -> Result<DescribeTableOutput, DynamoDBError> {
        let name = input.table_name.clone();
        self.record(Recorded::DescribeTable(input)).await;
        let table = self.tables.lock().get(&name).cloned();
        table
            .map(|t| DescribeTableOutput { table: Some(t) })
            .ok_or_else(|| {
                DynamoDBError::resource_not_found(format!(
                    "Requested resource not found: Table: {name} not found"
                ))
            })
    }

    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, DynamoDBError> {
        self.record(Recorded::GetItem(input)).await;
        pop(&self.get_items)
    }

    async fn query(&self, input: QueryInput) -> Result<QueryOutput, DynamoDBError> {
        self.record(Recorded::Query(input)).await;
        pop(&self.queries)
    }

    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, DynamoDBError> {
        self.record(Recorded::Scan(input)).await;
        pop(&self.scans)
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<UpdateItemOutput, DynamoDBError> {
        self.record(Recorded::UpdateItem(input)).await;
        pop(&self.updates)
    }
}

/// Description of a table with a hash key, an optional range key and global
/// indexes given as `(name, partition key)`.
pub(crate) fn table_description(
    name: &str,
    hash_key: &str,
    range_key: Option<&str>,
    indexes: &[(&str, Option<&str>)],
) -> TableDescription {
    let mut key_schema = vec![KeySchemaElement::hash(hash_key)];
    key_schema.extend(range_key.map(KeySchemaElement::range));
    TableDescription {
        table_name: Some(name.to_owned()),
        key_schema,
        item_count: Some(0),
        global_secondary_indexes: indexes
            .iter()
            .map(|(index, field)| SecondaryIndexDescription {
                index_name: Some((*index).to_owned()),
                key_schema: field.map(KeySchemaElement::hash).into_iter().collect(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub(crate) fn item(attributes: &[(&str, AttributeValue)]) -> Item {
    attributes
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect()
}
