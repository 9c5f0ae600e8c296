//! Per-statement entry point used by the shell.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::DynoqlConfig;
use crate::error::DynoqlError;
use crate::executor::Executor;
use crate::result::StatementResult;
use crate::schema::SchemaCache;
use crate::statement::{END_SENTINEL, parse};
use crate::store::DynamoStore;

/// Runs statements as independent tasks over a shared store and schema
/// cache.
///
/// Cancellation is best effort: the dispatcher stops waiting and returns
/// [`DynoqlError::Cancelled`], while a store call already in flight runs to
/// completion in the background and its result is dropped.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    executor: Executor,
}

impl Dispatcher {
    /// Create a dispatcher with a fresh schema cache.
    #[must_use]
    pub fn new(store: Arc<dyn DynamoStore>, config: &DynoqlConfig) -> Self {
        let schemas = Arc::new(SchemaCache::new(Arc::clone(&store)));
        Self::with_schema_cache(store, schemas, config)
    }

    /// Create a dispatcher sharing an existing schema cache.
    #[must_use]
    pub fn with_schema_cache(
        store: Arc<dyn DynamoStore>,
        schemas: Arc<SchemaCache>,
        config: &DynoqlConfig,
    ) -> Self {
        Self {
            executor: Executor::new(store, schemas, config),
        }
    }

    /// The schema cache shared by every statement.
    #[must_use]
    pub fn schemas(&self) -> &Arc<SchemaCache> {
        self.executor.schemas()
    }

    /// Run one statement to completion.
    ///
    /// # Errors
    ///
    /// Returns the statement's error unchanged.
    pub async fn run(&self, text: &str) -> Result<StatementResult, DynoqlError> {
        self.run_with_cancel(text, &CancellationToken::new()).await
    }

    /// Run one statement, giving up as soon as `cancel` fires.
    ///
    /// Blank input yields [`StatementResult::Empty`] without touching the
    /// store.
    ///
    /// # Errors
    ///
    /// Returns the statement's error unchanged, [`DynoqlError::Cancelled`]
    /// when cancelled, or [`DynoqlError::Internal`] when the task panicked.
    pub async fn run_with_cancel(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<StatementResult, DynoqlError> {
        let Some(statement) = prepare(text) else {
            return Ok(StatementResult::Empty);
        };

        let executor = self.executor.clone();
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let statement = parse(&statement)?;
            debug!(kind = statement.kind(), table = statement.table(), "parsed statement");
            executor.execute(statement, &task_cancel).await
        });

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                warn!("statement cancelled, an in-flight store call finishes in the background");
                Err(DynoqlError::Cancelled)
            }
            joined = task => joined
                .map_err(|e| DynoqlError::Internal(format!("statement task failed: {e}")))?,
        }
    }
}

/// Normalize raw input into parser text.
///
/// Trims whitespace and one trailing `;`, then appends the `END` sentinel.
/// Returns `None` for blank input.
#[must_use]
pub fn prepare(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("{trimmed} {END_SENTINEL}"))
}

#[cfg(test)]
mod tests {
    use dynoql_model::AttributeValue;
    use dynoql_model::output::ScanOutput;

    use super::*;
    use crate::testing::{Recorded, ScriptedStore, item, table_description};

    fn dispatcher(store: &Arc<ScriptedStore>) -> Dispatcher {
        Dispatcher::new(store.clone(), &DynoqlConfig::default())
    }

    #[test]
    fn test_should_prepare_statement_text() {
        assert_eq!(
            prepare("  select * from user; ").as_deref(),
            Some("select * from user END")
        );
        assert_eq!(prepare(" ; "), None);
        assert_eq!(prepare(""), None);
    }

    #[tokio::test]
    async fn test_should_return_empty_for_blank_input() {
        let store = Arc::new(ScriptedStore::new());
        let result = dispatcher(&store).run("   ").await.unwrap();
        assert_eq!(result, StatementResult::Empty);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_should_run_select_end_to_end() {
        let store = Arc::new(ScriptedStore::new());
        store.push_scan(Ok(ScanOutput {
            items: vec![item(&[("id", AttributeValue::number(1))])],
            count: 1,
            scanned_count: 1,
            ..Default::default()
        }));
        let result = dispatcher(&store)
            .run("SELECT * FROM user LIMIT ALL;")
            .await
            .unwrap();
        assert_eq!(result.row_count(), 1);
    }

    #[tokio::test]
    async fn test_should_reject_unsupported_statement() {
        let store = Arc::new(ScriptedStore::new());
        let err = dispatcher(&store).run("DROP TABLE user").await.unwrap_err();
        assert!(matches!(err, DynoqlError::MalformedStatement(_)));
    }

    #[tokio::test]
    async fn test_should_reject_update_with_malformed_key_condition() {
        let store = Arc::new(ScriptedStore::new());
        store.add_table(table_description("user", "user_id", None, &[]));
        let err = dispatcher(&store)
            .run("UPDATE user SET age=1 WHERE user_id+123")
            .await
            .unwrap_err();
        assert!(matches!(err, DynoqlError::MalformedStatement(_)));
    }

    #[tokio::test]
    async fn test_should_share_schema_cache_across_statements() {
        let store = Arc::new(ScriptedStore::new());
        store.add_table(table_description("user", "id", None, &[]));
        let dispatcher = dispatcher(&store);

        dispatcher.run("DESC TABLE user").await.unwrap();
        dispatcher.run("desc table user;").await.unwrap();

        let describes = store
            .calls()
            .iter()
            .filter(|c| matches!(c, Recorded::DescribeTable(_)))
            .count();
        assert_eq!(describes, 1);
        assert!(dispatcher.schemas().cached("user").is_some());
    }

    #[tokio::test]
    async fn test_should_stop_waiting_on_cancel() {
        let store = Arc::new(ScriptedStore::new());
        store.stall();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = dispatcher(&store)
            .run_with_cancel("SELECT * FROM user", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, DynoqlError::Cancelled));
    }

    #[tokio::test]
    async fn test_should_cancel_while_call_is_in_flight() {
        let store = Arc::new(ScriptedStore::new());
        store.stall();
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = dispatcher(&store)
            .run_with_cancel("SELECT * FROM user", &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, DynoqlError::Cancelled));
        assert_eq!(store.calls().len(), 1);
    }
}
