//! Statement engine for dynoql.
//!
//! A statement flows through one pipeline:
//!
//! 1. **Parsing** ([`statement`]): raw text becomes a typed `SELECT`, `UPDATE`
//!    or `DESC TABLE` statement.
//! 2. **Planning** ([`planner`]): a `SELECT` is matched against the cached
//!    table schema ([`schema`]) to pick a point get, an index query, a
//!    primary-key query or a filtered scan.
//! 3. **Expression building** ([`expression`]): conditions, projections and
//!    assignments become native DynamoDB expressions with placeholder maps.
//! 4. **Execution** ([`executor`]): the plan is driven against a
//!    [`DynamoStore`], paginating scans until the limit is met.
//!
//! The [`Dispatcher`] runs each statement as its own task and supports
//! best-effort cancellation.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod expression;
pub mod planner;
pub mod result;
pub mod schema;
pub mod statement;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::DynoqlConfig;
pub use dispatcher::Dispatcher;
pub use error::DynoqlError;
pub use executor::Executor;
pub use planner::QueryPlan;
pub use result::StatementResult;
pub use schema::{SchemaCache, SecondaryIndex, TableSchema};
pub use store::{DynamoStore, list_tables};
