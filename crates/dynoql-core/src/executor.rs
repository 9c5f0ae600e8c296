//! Drives a planned statement against the store.
//!
//! Point gets and queries are a single native call. Filtered scans loop page
//! by page with an explicit cursor, because the store applies the filter
//! after reading each page and a page can come back short. The cancellation
//! token is checked before every page; an in-flight call is never aborted.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use dynoql_model::input::{GetItemInput, QueryInput, ScanInput, UpdateItemInput};
use dynoql_model::types::ReturnValue;
use dynoql_model::{AttributeValue, DynamoDBOperation, Item, Key};

use crate::config::DynoqlConfig;
use crate::error::DynoqlError;
use crate::expression::{CompareOp, ExpressionBuilder, matches_all, project};
use crate::planner::{self, QueryPlan};
use crate::result::StatementResult;
use crate::schema::{SchemaCache, TableSchema};
use crate::statement::{
    Condition, DescribeStatement, Limit, SelectStatement, Statement, UpdateStatement,
};
use crate::store::DynamoStore;

/// Executes parsed statements. Cheap to clone; clones share the store and
/// the schema cache.
#[derive(Debug, Clone)]
pub struct Executor {
    store: Arc<dyn DynamoStore>,
    schemas: Arc<SchemaCache>,
    scan_page_size: i32,
}

impl Executor {
    /// Create an executor.
    #[must_use]
    pub fn new(
        store: Arc<dyn DynamoStore>,
        schemas: Arc<SchemaCache>,
        config: &DynoqlConfig,
    ) -> Self {
        Self {
            store,
            schemas,
            scan_page_size: config.scan_page_size,
        }
    }

    /// The shared schema cache.
    #[must_use]
    pub fn schemas(&self) -> &Arc<SchemaCache> {
        &self.schemas
    }

    /// Execute one statement.
    ///
    /// # Errors
    ///
    /// Returns the first error of any pipeline stage; no rows accompany it.
    pub async fn execute(
        &self,
        statement: Statement,
        cancel: &CancellationToken,
    ) -> Result<StatementResult, DynoqlError> {
        match statement {
            Statement::Select(stmt) => self.select(&stmt, cancel).await,
            Statement::Update(stmt) => self.update(&stmt).await,
            Statement::Describe(stmt) => self.describe(&stmt).await,
        }
    }

    /// Plan and run a SELECT.
    ///
    /// A SELECT without conditions scans without describing the table.
    ///
    /// # Errors
    ///
    /// Returns [`DynoqlError::MalformedStatement`] for an unparseable
    /// condition, otherwise any schema, expression or store error.
    pub async fn select(
        &self,
        stmt: &SelectStatement,
        cancel: &CancellationToken,
    ) -> Result<StatementResult, DynoqlError> {
        reject_malformed(&stmt.conditions)?;

        let (plan, schema) = if stmt.conditions.is_empty() {
            (QueryPlan::FilteredScan, None)
        } else {
            let schema = self.schemas.get(&stmt.table).await?;
            (planner::plan(stmt, &schema), Some(schema))
        };
        info!(
            table = %stmt.table,
            plan = plan.name(),
            limit = stmt.limit.as_i64(),
            "executing select"
        );

        match plan {
            QueryPlan::PointGet { key } => self.point_get(stmt, key).await,
            QueryPlan::IndexQuery {
                index_name,
                condition,
            } => self.query(stmt, Some(index_name), &[&condition]).await,
            QueryPlan::PrimaryKeyQuery { condition } => {
                let range = schema
                    .as_deref()
                    .and_then(|s| range_key_condition(stmt, s));
                let mut key_terms = vec![&condition];
                key_terms.extend(range);
                self.query(stmt, None, &key_terms).await
            }
            QueryPlan::FilteredScan => self
                .filtered_scan(stmt, cancel)
                .await
                .map(StatementResult::Items),
        }
    }

    async fn point_get(
        &self,
        stmt: &SelectStatement,
        key: Key,
    ) -> Result<StatementResult, DynoqlError> {
        let residual: Vec<&Condition> = stmt
            .conditions
            .iter()
            .filter(|c| !is_key_term(c, &key))
            .collect();

        // Residual terms are checked locally, so their attributes must be
        // fetched even when not selected.
        let mut fetched = stmt.attributes.clone();
        if !stmt.selects_all() {
            for condition in &residual {
                if !fetched.contains(&condition.key) {
                    fetched.push(condition.key.clone());
                }
            }
        }

        let mut builder = ExpressionBuilder::new();
        let projection_expression = builder.projection(&fetched);
        let built = builder.finish();
        let input = GetItemInput {
            table_name: stmt.table.clone(),
            key,
            projection_expression,
            expression_attribute_names: built.names,
        };
        debug!(table = %stmt.table, ?input, "GetItem");

        let output = self
            .store
            .get_item(input)
            .await
            .map_err(|e| DynoqlError::store(DynamoDBOperation::GetItem, &stmt.table, e))?;

        let item = output
            .item
            .filter(|item| matches_all(item, residual.iter().copied()))
            .map(|mut item| {
                project(&mut item, &stmt.attributes);
                item
            });
        Ok(StatementResult::Item(item))
    }

    async fn query(
        &self,
        stmt: &SelectStatement,
        index_name: Option<String>,
        key_terms: &[&Condition],
    ) -> Result<StatementResult, DynoqlError> {
        let mut builder = ExpressionBuilder::new();
        let key_condition_expression = builder.key_condition(key_terms)?;
        let consumed: Vec<&str> = key_terms.iter().map(|c| c.key.as_str()).collect();
        let filter_expression =
            builder.filter(&stmt.conditions, &consumed, index_name.as_deref());

        // Key attributes may not appear in a filter expression, so further
        // terms on a key field are checked on the returned rows.
        let local: Vec<&Condition> = stmt
            .conditions
            .iter()
            .filter(|c| consumed.contains(&c.key.as_str()) && !key_terms.contains(c))
            .collect();
        let mut fetched = stmt.attributes.clone();
        if !stmt.selects_all() {
            for condition in &local {
                if !fetched.contains(&condition.key) {
                    fetched.push(condition.key.clone());
                }
            }
        }
        let projection_expression = builder.projection(&fetched);
        let built = builder.finish();

        let input = QueryInput {
            table_name: stmt.table.clone(),
            index_name,
            key_condition_expression: Some(key_condition_expression),
            filter_expression,
            projection_expression,
            expression_attribute_names: built.names,
            expression_attribute_values: built.values,
            // A native limit would count rows the local check then drops.
            limit: if local.is_empty() {
                native_limit(stmt.limit)
            } else {
                None
            },
            exclusive_start_key: Key::new(),
        };
        debug!(table = %stmt.table, ?input, local = local.len(), "Query");

        let output = self
            .store
            .query(input)
            .await
            .map_err(|e| DynoqlError::store(DynamoDBOperation::Query, &stmt.table, e))?;

        let mut items = output.items;
        if !local.is_empty() {
            items.retain(|item| matches_all(item, local.iter().copied()));
            for item in &mut items {
                project(item, &stmt.attributes);
            }
        }
        items.truncate(stmt.limit.remaining(0));
        Ok(StatementResult::Items(items))
    }

    async fn filtered_scan(
        &self,
        stmt: &SelectStatement,
        cancel: &CancellationToken,
    ) -> Result<Vec<Item>, DynoqlError> {
        let mut rows = Vec::new();
        if stmt.limit.is_reached(rows.len()) {
            return Ok(rows);
        }

        let mut builder = ExpressionBuilder::new();
        let filter_expression = builder.filter(&stmt.conditions, &[], None);
        let projection_expression = builder.projection(&stmt.attributes);
        let built = builder.finish();
        let unfiltered = filter_expression.is_none();
        let template = ScanInput {
            table_name: stmt.table.clone(),
            filter_expression,
            projection_expression,
            expression_attribute_names: built.names,
            expression_attribute_values: built.values,
            limit: None,
            exclusive_start_key: Key::new(),
        };

        let mut cursor = Key::new();
        let mut page = 0_usize;
        loop {
            if cancel.is_cancelled() {
                debug!(table = %stmt.table, page, "scan cancelled between pages");
                return Err(DynoqlError::Cancelled);
            }
            page += 1;

            let wanted = stmt.limit.remaining(rows.len());
            // Without a filter every evaluated item is returned, so there is
            // no point reading past the limit.
            let page_limit = if unfiltered {
                i32::try_from(wanted).map_or(self.scan_page_size, |w| w.min(self.scan_page_size))
            } else {
                self.scan_page_size
            };
            let input = ScanInput {
                limit: Some(page_limit),
                exclusive_start_key: std::mem::take(&mut cursor),
                ..template.clone()
            };

            let output = self
                .store
                .scan(input)
                .await
                .map_err(|e| DynoqlError::store(DynamoDBOperation::Scan, &stmt.table, e))?;

            let matched = output.items.len();
            rows.extend(output.items.into_iter().take(wanted));
            debug!(
                table = %stmt.table,
                page,
                matched,
                scanned = output.scanned_count,
                total = rows.len(),
                "scan page"
            );

            if stmt.limit.is_reached(rows.len()) || output.last_evaluated_key.is_empty() {
                return Ok(rows);
            }
            cursor = output.last_evaluated_key;
        }
    }

    /// Run an UPDATE against the item pinned down by its WHERE clause.
    ///
    /// WHERE terms beyond the primary key become a condition expression. The
    /// updated item is requested as `ALL_NEW` and projected to the RETURNING
    /// list locally.
    ///
    /// # Errors
    ///
    /// Returns [`DynoqlError::MalformedStatement`] for an unparseable
    /// condition, [`DynoqlError::KeyResolution`] when a key attribute has no
    /// `=` term, [`DynoqlError::ExpressionBuild`] when SET is empty, and any
    /// schema or store error.
    pub async fn update(&self, stmt: &UpdateStatement) -> Result<StatementResult, DynoqlError> {
        reject_malformed(&stmt.conditions)?;
        let schema = self.schemas.get(&stmt.table).await?;

        let key = planner::full_key(&stmt.conditions, &schema).ok_or_else(|| {
            let missing: Vec<&str> = schema
                .key_fields()
                .filter(|f| !stmt.conditions.iter().any(|c| c.is_equality_on(f)))
                .collect();
            DynoqlError::KeyResolution {
                table: stmt.table.clone(),
                message: format!("WHERE needs `=` on key attribute {}", missing.join(", ")),
            }
        })?;
        let residual: Vec<&Condition> = stmt
            .conditions
            .iter()
            .filter(|c| !is_key_term(c, &key))
            .collect();

        let mut builder = ExpressionBuilder::new();
        let update_expression = builder.update(&stmt.assignments)?;
        let condition_expression = builder.conjunction(residual).map(|e| e.to_string());
        let built = builder.finish();

        let input = UpdateItemInput {
            table_name: stmt.table.clone(),
            key,
            update_expression: Some(update_expression),
            condition_expression,
            expression_attribute_names: built.names,
            expression_attribute_values: built.values,
            return_values: Some(ReturnValue::AllNew),
        };
        info!(table = %stmt.table, "executing update");
        debug!(?input, "UpdateItem");

        let output = self
            .store
            .update_item(input)
            .await
            .map_err(|e| DynoqlError::store(DynamoDBOperation::UpdateItem, &stmt.table, e))?;

        let mut item = output.attributes;
        project(&mut item, &stmt.returning);
        Ok(StatementResult::Item(Some(item)))
    }

    /// Return the cached schema of a table.
    ///
    /// # Errors
    ///
    /// Returns [`DynoqlError::SchemaFetch`] when the table cannot be described.
    pub async fn describe(&self, stmt: &DescribeStatement) -> Result<StatementResult, DynoqlError> {
        self.schemas
            .get(&stmt.table)
            .await
            .map(StatementResult::Table)
    }
}

fn reject_malformed(conditions: &[Condition]) -> Result<(), DynoqlError> {
    if conditions.iter().any(Condition::is_malformed) {
        return Err(DynoqlError::malformed(
            "WHERE has a condition without a recognized operator",
        ));
    }
    Ok(())
}

/// Whether `condition` is the `=` term that supplied its value to `key`.
fn is_key_term(condition: &Condition, key: &Key) -> bool {
    condition.op == crate::statement::Operator::Eq
        && key.get(&condition.key) == Some(&AttributeValue::from(condition.literal()))
}

/// First sort-key comparison usable in a key condition.
fn range_key_condition<'s>(
    stmt: &'s SelectStatement,
    schema: &TableSchema,
) -> Option<&'s Condition> {
    let range_key = schema.range_key.as_deref()?;
    stmt.conditions.iter().find(|c| {
        c.key == range_key
            && CompareOp::from_operator(c.op).is_some_and(|op| op.is_key_condition())
    })
}

fn native_limit(limit: Limit) -> Option<i32> {
    match limit {
        Limit::Count(n) => Some(i32::try_from(n).unwrap_or(i32::MAX)),
        Limit::All => None,
    }
}
