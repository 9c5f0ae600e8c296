//! Request shapes for the six store operations.
//!
//! Field names mirror the DynamoDB API members. `None` and empty maps mean
//! the member is left unset on the outgoing request.

use std::collections::HashMap;

use crate::attribute_value::AttributeValue;
use crate::types::ReturnValue;

// ---------------------------------------------------------------------------
// Table metadata
// ---------------------------------------------------------------------------

/// Input for the `DescribeTable` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeTableInput {
    /// The name of the table to describe.
    pub table_name: String,
}

/// Input for the `ListTables` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListTablesInput {
    /// The name of the table that starts the list. Use the value returned in
    /// `LastEvaluatedTableName` from a previous request to continue pagination.
    pub exclusive_start_table_name: Option<String>,

    /// The maximum number of table names to return (1--100).
    pub limit: Option<i32>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Input for the `GetItem` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetItemInput {
    /// The name of the table containing the item.
    pub table_name: String,

    /// The full primary key of the item.
    pub key: HashMap<String, AttributeValue>,

    /// The attributes to retrieve.
    pub projection_expression: Option<String>,

    /// Substitution tokens for attribute names in the projection.
    pub expression_attribute_names: HashMap<String, String>,
}

/// Input for the `Query` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryInput {
    /// The name of the table to query.
    pub table_name: String,

    /// The name of a secondary index to query.
    pub index_name: Option<String>,

    /// The condition that specifies the key values for items to be retrieved.
    pub key_condition_expression: Option<String>,

    /// A string that contains conditions for filtering the query results.
    pub filter_expression: Option<String>,

    /// A string that identifies the attributes to retrieve from the table.
    pub projection_expression: Option<String>,

    /// Substitution tokens for attribute names in an expression.
    pub expression_attribute_names: HashMap<String, String>,

    /// Substitution tokens for attribute values in an expression.
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// The maximum number of items to evaluate (not necessarily the number of
    /// matching items).
    pub limit: Option<i32>,

    /// The primary key of the first item that this operation will evaluate.
    pub exclusive_start_key: HashMap<String, AttributeValue>,
}

/// Input for the `Scan` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanInput {
    /// The name of the table to scan.
    pub table_name: String,

    /// A string that contains conditions for filtering the scan results.
    pub filter_expression: Option<String>,

    /// A string that identifies the attributes to retrieve from the table.
    pub projection_expression: Option<String>,

    /// Substitution tokens for attribute names in an expression.
    pub expression_attribute_names: HashMap<String, String>,

    /// Substitution tokens for attribute values in an expression.
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// The maximum number of items to evaluate per page.
    pub limit: Option<i32>,

    /// The primary key of the first item that this operation will evaluate.
    /// Empty on the first page.
    pub exclusive_start_key: HashMap<String, AttributeValue>,
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Input for the `UpdateItem` operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateItemInput {
    /// The name of the table containing the item to update.
    pub table_name: String,

    /// The full primary key of the item.
    pub key: HashMap<String, AttributeValue>,

    /// The `SET` expression describing the new attribute values.
    pub update_expression: Option<String>,

    /// A condition that must hold for the update to succeed.
    pub condition_expression: Option<String>,

    /// Substitution tokens for attribute names in an expression.
    pub expression_attribute_names: HashMap<String, String>,

    /// Substitution tokens for attribute values in an expression.
    pub expression_attribute_values: HashMap<String, AttributeValue>,

    /// Which item image the store should return.
    pub return_values: Option<ReturnValue>,
}
