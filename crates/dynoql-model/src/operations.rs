//! Store operations issued by the statement engine.

use std::fmt;

/// DynamoDB operations the engine calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DynamoDBOperation {
    /// List table names, one page at a time.
    ListTables,
    /// Fetch table metadata.
    DescribeTable,
    /// Read one item by its full primary key.
    GetItem,
    /// Read items sharing a key-condition.
    Query,
    /// Read a page of the whole table.
    Scan,
    /// Update one item by its full primary key.
    UpdateItem,
}

impl DynamoDBOperation {
    /// Returns the AWS operation name string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListTables => "ListTables",
            Self::DescribeTable => "DescribeTable",
            Self::GetItem => "GetItem",
            Self::Query => "Query",
            Self::Scan => "Scan",
            Self::UpdateItem => "UpdateItem",
        }
    }
}

impl fmt::Display for DynamoDBOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
