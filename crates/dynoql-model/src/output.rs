//! Response shapes for the six store operations.

use std::collections::HashMap;

use crate::attribute_value::AttributeValue;
use crate::types::TableDescription;

/// Output for the `DescribeTable` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeTableOutput {
    /// The table description.
    pub table: Option<TableDescription>,
}

/// Output for the `ListTables` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListTablesOutput {
    /// The table names in this page.
    pub table_names: Vec<String>,

    /// The name of the last table in the current page of results. Use this
    /// value as `ExclusiveStartTableName` in a subsequent request to continue.
    pub last_evaluated_table_name: Option<String>,
}

/// Output for the `GetItem` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetItemOutput {
    /// The item, or `None` when no item has the requested key.
    pub item: Option<HashMap<String, AttributeValue>>,
}

/// Output for the `Query` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    /// Items that matched the key condition and filter.
    pub items: Vec<HashMap<String, AttributeValue>>,

    /// The number of items in the response.
    pub count: i32,

    /// The number of items evaluated before the filter expression was applied.
    pub scanned_count: i32,

    /// The primary key of the item where the query stopped.
    pub last_evaluated_key: HashMap<String, AttributeValue>,
}

/// Output for the `Scan` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutput {
    /// Items in this page that passed the filter.
    pub items: Vec<HashMap<String, AttributeValue>>,

    /// The number of items in the response.
    pub count: i32,

    /// The number of items evaluated before the filter expression was applied.
    pub scanned_count: i32,

    /// The primary key of the item where the scan stopped. Empty on the last
    /// page.
    pub last_evaluated_key: HashMap<String, AttributeValue>,
}

/// Output for the `UpdateItem` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateItemOutput {
    /// The item image requested through `ReturnValues`.
    pub attributes: HashMap<String, AttributeValue>,
}
