//! AWS SDK backed [`DynamoStore`](dynoql_core::DynamoStore) for dynoql.
//!
//! Session set-up returns errors instead of panicking so the binary decides
//! how to exit.
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod convert;
pub mod store;

pub use config::{AwsStoreConfig, AwsStoreError};
pub use store::AwsDynamoStore;
