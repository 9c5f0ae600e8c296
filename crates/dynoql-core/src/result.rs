//! Structured statement results.

use std::sync::Arc;

use dynoql_model::Item;

use crate::schema::TableSchema;

/// What a statement returns to the caller. Rendering is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementResult {
    /// Blank input; nothing was run.
    Empty,
    /// Rows from a query or scan.
    Items(Vec<Item>),
    /// A single row from a point get or update; `None` when no item matched.
    Item(Option<Item>),
    /// Table metadata from `DESC TABLE`.
    Table(Arc<TableSchema>),
}

impl StatementResult {
    /// Number of rows carried.
    #[must_use]
    pub fn row_count(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Item(item) => usize::from(item.is_some()),
            Self::Empty | Self::Table(_) => 0,
        }
    }
}
