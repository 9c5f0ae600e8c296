//! Rule-based choice of the native access pattern for a SELECT.
//!
//! Rules, first match wins:
//!
//! 1. no conditions: filtered scan;
//! 2. `=` on every primary key attribute: point get;
//! 3. `=` on the hash key: primary-key query, even when an index also matches;
//! 4. `=` on the field of a secondary index: index query (the last matching
//!    index in schema order);
//! 5. otherwise: filtered scan.
//!
//! There is no cost model; the planner never compares scanned-item estimates.

use dynoql_model::{AttributeValue, Key};

use crate::schema::TableSchema;
use crate::statement::{Condition, SelectStatement};

/// Native access pattern chosen for a SELECT.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPlan {
    /// `GetItem` with the full primary key.
    PointGet {
        /// Key attributes and their typed values.
        key: Key,
    },
    /// `Query` against a secondary index.
    IndexQuery {
        /// Index to query.
        index_name: String,
        /// Equality on the index's partition key.
        condition: Condition,
    },
    /// `Query` against the table's primary key.
    PrimaryKeyQuery {
        /// Equality on the table's hash key.
        condition: Condition,
    },
    /// Paginated `Scan` with a filter.
    FilteredScan,
}

impl QueryPlan {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PointGet { .. } => "point-get",
            Self::IndexQuery { .. } => "index-query",
            Self::PrimaryKeyQuery { .. } => "primary-key-query",
            Self::FilteredScan => "filtered-scan",
        }
    }
}

/// Choose the access pattern for `stmt` on a table shaped like `schema`.
#[must_use]
pub fn plan(stmt: &SelectStatement, schema: &TableSchema) -> QueryPlan {
    let conditions = &stmt.conditions;
    if conditions.is_empty() {
        return QueryPlan::FilteredScan;
    }

    if let Some(key) = full_key(conditions, schema) {
        return QueryPlan::PointGet { key };
    }

    let mut chosen = None;
    for index in &schema.secondary_indexes {
        if let Some(condition) = equality_on(conditions, &index.field) {
            chosen = Some(QueryPlan::IndexQuery {
                index_name: index.name.clone(),
                condition: condition.clone(),
            });
        }
    }

    if let Some(condition) = equality_on(conditions, &schema.hash_key) {
        chosen = Some(QueryPlan::PrimaryKeyQuery {
            condition: condition.clone(),
        });
    }

    chosen.unwrap_or(QueryPlan::FilteredScan)
}

/// Typed key values when every key attribute has an `=` condition.
#[must_use]
pub fn full_key(conditions: &[Condition], schema: &TableSchema) -> Option<Key> {
    schema
        .key_fields()
        .map(|field| {
            equality_on(conditions, field)
                .map(|c| (field.to_owned(), AttributeValue::from(c.literal())))
        })
        .collect()
}

fn equality_on<'c>(conditions: &'c [Condition], field: &str) -> Option<&'c Condition> {
    conditions.iter().find(|c| c.is_equality_on(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SecondaryIndex;
    use crate::statement::{Limit, Operator};
    use dynoql_model::types::TableDescription;

    fn schema(range_key: Option<&str>, indexes: &[(&str, &str)]) -> TableSchema {
        TableSchema {
            table_name: "user".to_owned(),
            hash_key: "id".to_owned(),
            range_key: range_key.map(str::to_owned),
            secondary_indexes: indexes
                .iter()
                .map(|(name, field)| SecondaryIndex {
                    name: (*name).to_owned(),
                    field: (*field).to_owned(),
                })
                .collect(),
            item_count: 0,
            description: TableDescription::default(),
        }
    }

    fn select(conditions: Vec<Condition>) -> SelectStatement {
        SelectStatement {
            attributes: vec!["*".to_owned()],
            table: "user".to_owned(),
            conditions,
            limit: Limit::default(),
        }
    }

    #[test]
    fn test_should_point_get_on_full_hash_key() {
        let stmt = select(vec![Condition::new("id", Operator::Eq, "5")]);
        let plan = plan(&stmt, &schema(None, &[]));
        assert_eq!(
            plan,
            QueryPlan::PointGet {
                key: Key::from([("id".to_owned(), AttributeValue::number(5))])
            }
        );
    }

    #[test]
    fn test_should_point_get_on_hash_and_range() {
        let stmt = select(vec![
            Condition::new("ts", Operator::Eq, "\"2020\""),
            Condition::new("id", Operator::Eq, "5"),
            Condition::new("age", Operator::Gt, "3"),
        ]);
        let QueryPlan::PointGet { key } = plan(&stmt, &schema(Some("ts"), &[])) else {
            panic!("expected point get");
        };
        assert_eq!(key.len(), 2);
        assert_eq!(key.get("ts"), Some(&AttributeValue::string("2020")));
    }

    #[test]
    fn test_should_query_index_on_indexed_field() {
        let stmt = select(vec![Condition::new("category", Operator::Eq, "foo")]);
        let plan = plan(&stmt, &schema(Some("ts"), &[("category-index", "category")]));
        assert_eq!(
            plan,
            QueryPlan::IndexQuery {
                index_name: "category-index".to_owned(),
                condition: Condition::new("category", Operator::Eq, "foo"),
            }
        );
    }

    #[test]
    fn test_should_prefer_hash_key_over_index() {
        let stmt = select(vec![
            Condition::new("id", Operator::Eq, "5"),
            Condition::new("category", Operator::Eq, "foo"),
        ]);
        let plan = plan(&stmt, &schema(Some("ts"), &[("category-index", "category")]));
        assert_eq!(
            plan,
            QueryPlan::PrimaryKeyQuery {
                condition: Condition::new("id", Operator::Eq, "5"),
            }
        );
    }

    #[test]
    fn test_should_scan_on_unindexed_field() {
        let stmt = select(vec![Condition::new("age", Operator::Eq, "30")]);
        let plan = plan(&stmt, &schema(Some("ts"), &[("category-index", "category")]));
        assert_eq!(plan, QueryPlan::FilteredScan);
    }

    #[test]
    fn test_should_scan_without_conditions() {
        let plan = plan(&select(Vec::new()), &schema(None, &[]));
        assert_eq!(plan, QueryPlan::FilteredScan);
    }

    #[test]
    fn test_should_ignore_non_equality_on_keys() {
        let stmt = select(vec![
            Condition::new("id", Operator::Gt, "5"),
            Condition::new("category", Operator::Ne, "foo"),
        ]);
        let plan = plan(&stmt, &schema(None, &[("category-index", "category")]));
        assert_eq!(plan, QueryPlan::FilteredScan);
    }

    #[test]
    fn test_should_pick_last_matching_index() {
        let stmt = select(vec![
            Condition::new("category", Operator::Eq, "foo"),
            Condition::new("owner", Operator::Eq, "bob"),
        ]);
        let plan = plan(
            &stmt,
            &schema(None, &[("category-index", "category"), ("owner-index", "owner")]),
        );
        assert!(matches!(
            plan,
            QueryPlan::IndexQuery { ref index_name, .. } if index_name == "owner-index"
        ));
    }
}
