//! DynamoDB model types for dynoql.
//!
//! The statement engine talks to the store through plain Rust structs that
//! mirror the DynamoDB API shapes. Only the six operations
//! the engine issues are modelled: `ListTables`, `DescribeTable`, `GetItem`,
//! `Query`, `Scan` and `UpdateItem`.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use error::{DynamoDBError, DynamoDBErrorCode};
pub use operations::DynamoDBOperation;
pub use types::{Item, Key};
