//! Table schemas and the process-wide schema cache.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, warn};

use dynoql_model::DynamoDBError;
use dynoql_model::input::DescribeTableInput;
use dynoql_model::types::{KeySchemaElement, KeyType, SecondaryIndexDescription, TableDescription};

use crate::error::DynoqlError;
use crate::store::DynamoStore;

/// A global secondary index usable for equality queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryIndex {
    /// Index name passed as `IndexName`.
    pub name: String,
    /// Partition key attribute of the index.
    pub field: String,
}

impl SecondaryIndex {
    fn from_description(desc: &SecondaryIndexDescription) -> Option<Self> {
        let name = desc.index_name.clone()?;
        // Indexes reporting no key schema fall back to the `<field>-index`
        // naming convention.
        let field = hash_key_of(&desc.key_schema).map_or_else(
            || name.split('-').next().unwrap_or(&name).to_owned(),
            str::to_owned,
        );
        Some(Self { name, field })
    }
}

/// Key layout of one table, derived once from `DescribeTable`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    /// Table name.
    pub table_name: String,
    /// Partition key attribute.
    pub hash_key: String,
    /// Sort key attribute, if the table has one.
    pub range_key: Option<String>,
    /// Global secondary indexes in the order the store reported them.
    pub secondary_indexes: Vec<SecondaryIndex>,
    /// Approximate item count at describe time.
    pub item_count: i64,
    /// The raw description, kept for `DESC TABLE` output.
    pub description: TableDescription,
}

impl TableSchema {
    /// Derive a schema from a table description.
    ///
    /// # Errors
    ///
    /// Fails when the description is missing or has no `HASH` key.
    pub fn from_description(
        table: &str,
        description: Option<TableDescription>,
    ) -> Result<Self, DynamoDBError> {
        let description = description.ok_or_else(|| {
            DynamoDBError::resource_not_found(format!("no description returned for table {table}"))
        })?;
        let hash_key = hash_key_of(&description.key_schema)
            .ok_or_else(|| {
                DynamoDBError::validation(format!("table {table} reports no HASH key"))
            })?
            .to_owned();
        let range_key = description
            .key_schema
            .iter()
            .find(|k| k.key_type == KeyType::Range)
            .map(|k| k.attribute_name.clone());
        let secondary_indexes = description
            .global_secondary_indexes
            .iter()
            .filter_map(SecondaryIndex::from_description)
            .collect();

        Ok(Self {
            table_name: description
                .table_name
                .clone()
                .unwrap_or_else(|| table.to_owned()),
            hash_key,
            range_key,
            secondary_indexes,
            item_count: description.item_count.unwrap_or_default(),
            description,
        })
    }

    /// Primary key attributes: the hash key, then the range key if any.
    pub fn key_fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.hash_key.as_str()).chain(self.range_key.as_deref())
    }

    /// Whether `field` is part of the primary key.
    #[must_use]
    pub fn is_key_field(&self, field: &str) -> bool {
        self.key_fields().any(|k| k == field)
    }
}

fn hash_key_of(key_schema: &[KeySchemaElement]) -> Option<&str> {
    key_schema
        .iter()
        .find(|k| k.key_type == KeyType::Hash)
        .map(|k| k.attribute_name.as_str())
}

/// Table name to schema, filled on first use and never invalidated.
///
/// Lookups never block each other. Two tasks missing on the same table at
/// once may both describe it; the later insert wins, which is harmless
/// because both fetched the same metadata.
#[derive(Debug)]
pub struct SchemaCache {
    store: Arc<dyn DynamoStore>,
    entries: DashMap<String, Arc<TableSchema>>,
}

impl SchemaCache {
    /// Create an empty cache fetching through `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DynamoStore>) -> Self {
        Self {
            store,
            entries: DashMap::new(),
        }
    }

    /// Schema of `table`, describing it on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`DynoqlError::SchemaFetch`] when the describe call fails.
    /// Failures are not cached.
    pub async fn get(&self, table: &str) -> Result<Arc<TableSchema>, DynoqlError> {
        if let Some(schema) = self.cached(table) {
            debug!(table, "schema cache hit");
            return Ok(schema);
        }

        debug!(table, "schema cache miss, describing table");
        let fetch_error = |source| DynoqlError::SchemaFetch {
            table: table.to_owned(),
            source,
        };
        let output = self
            .store
            .describe_table(DescribeTableInput {
                table_name: table.to_owned(),
            })
            .await
            .map_err(fetch_error)?;
        let schema = Arc::new(TableSchema::from_description(table, output.table).map_err(fetch_error)?);

        self.entries.insert(table.to_owned(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Schema of `table` if it is already cached.
    #[must_use]
    pub fn cached(&self, table: &str) -> Option<Arc<TableSchema>> {
        self.entries.get(table).map(|r| Arc::clone(r.value()))
    }

    /// Number of cached schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Describe every table in `tables` ahead of use.
    ///
    /// Failures are logged and skipped. Returns how many schemas were loaded.
    pub async fn warm_up(&self, tables: &[String]) -> usize {
        let mut loaded = 0;
        for table in tables {
            match self.get(table).await {
                Ok(_) => loaded += 1,
                Err(e) => warn!(table = %table, error = %e, "schema warm-up failed"),
            }
        }
        info!(loaded, total = tables.len(), "schema warm-up finished");
        loaded
    }
}
