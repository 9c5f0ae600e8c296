//! Statement engine errors.
//!
//! Every pipeline stage returns a [`DynoqlError`]; the first error aborts the
//! statement and reaches the caller unchanged, with no partial rows attached.

use dynoql_model::{DynamoDBError, DynamoDBOperation};

/// Errors produced while parsing, planning or executing a statement.
#[derive(Debug, thiserror::Error)]
pub enum DynoqlError {
    /// The statement text could not be understood.
    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    /// Table metadata could not be fetched.
    #[error("cannot describe table {table}: {source}")]
    SchemaFetch {
        /// Table that was being described.
        table: String,
        /// The store's error.
        #[source]
        source: DynamoDBError,
    },

    /// A native expression could not be built from the statement.
    #[error("cannot build expression: {0}")]
    ExpressionBuild(String),

    /// A native store call failed.
    #[error("{operation} failed: {source}")]
    StoreCall {
        /// The failing operation.
        operation: DynamoDBOperation,
        /// Table the call targeted. Empty for `ListTables`.
        table: String,
        /// The store's error.
        #[source]
        source: DynamoDBError,
    },

    /// The WHERE clause does not pin down the full primary key.
    #[error("cannot resolve primary key of {table}: {message}")]
    KeyResolution {
        /// Table whose key was being resolved.
        table: String,
        /// What was missing.
        message: String,
    },

    /// The caller stopped waiting for the statement.
    #[error("statement cancelled")]
    Cancelled,

    /// The statement task failed outside the pipeline.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DynoqlError {
    /// Wrap a failed store call.
    #[must_use]
    pub fn store(operation: DynamoDBOperation, table: &str, source: DynamoDBError) -> Self {
        Self::StoreCall {
            operation,
            table: table.to_owned(),
            source,
        }
    }

    /// Build a [`DynoqlError::MalformedStatement`].
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedStatement(message.into())
    }
}
