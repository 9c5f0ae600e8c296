//! dynoql - SQL-like statements against DynamoDB.
//!
//! # Usage
//!
//! ```text
//! dynoql                                   # interactive, one statement per line
//! dynoql "SELECT * FROM user WHERE id=1"   # run once and exit
//! ```
//!
//! Ctrl-C cancels the running statement; at the prompt it exits.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DYNOQL_REGION` | `AWS_REGION` | Region |
//! | `DYNOQL_ENDPOINT_URL` | *(unset)* | Endpoint override |
//! | `DYNOQL_ACCESS_KEY_ID` | *(unset)* | Static access key id |
//! | `DYNOQL_SECRET_ACCESS_KEY` | *(unset)* | Static secret key |
//! | `DYNOQL_SCAN_PAGE_SIZE` | `100` | Native `Limit` per scan page |
//! | `DYNOQL_TABLE_PREFIX` | *(unset)* | Only warm up tables with this prefix |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod output;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dynoql_aws::{AwsDynamoStore, AwsStoreConfig};
use dynoql_core::{Dispatcher, DynamoStore, DynoqlConfig, SchemaCache, list_tables};

const PROMPT: &str = "dynoql> ";

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Pre-fetch schemas in the background so the first statements skip
/// `DescribeTable`.
fn spawn_warm_up(store: Arc<dyn DynamoStore>, schemas: Arc<SchemaCache>, prefix: Option<String>) {
    tokio::spawn(async move {
        match list_tables(store.as_ref(), prefix.as_deref()).await {
            Ok(tables) => {
                info!(tables = tables.len(), "warming up schemas");
                schemas.warm_up(&tables).await;
            }
            Err(e) => warn!(error = %e, "schema warm-up skipped, could not list tables"),
        }
    });
}

fn print_result(result: &dynoql_core::StatementResult) -> Result<()> {
    if let Some(text) = output::render(result)? {
        println!("{text}");
    }
    Ok(())
}

/// Read statements from stdin until EOF, `quit` or `exit`.
async fn run_interactive(dispatcher: &Dispatcher) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{PROMPT}");
        std::io::stdout().flush().context("failed to flush stdout")?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            return Ok(());
        };
        if matches!(line.trim().to_ascii_lowercase().as_str(), "quit" | "exit") {
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let run = dispatcher.run_with_cancel(&line, &cancel);
        tokio::pin!(run);
        let finished = tokio::select! {
            result = &mut run => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };
        let result = match finished {
            Some(result) => result,
            None => {
                cancel.cancel();
                run.await
            }
        };

        match result {
            Ok(result) => print_result(&result)?,
            Err(e) => eprintln!("error: {e}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DynoqlConfig::from_env();
    init_tracing(&config.log_level)?;

    let aws_config = AwsStoreConfig::from_env();
    let store: Arc<dyn DynamoStore> = Arc::new(
        AwsDynamoStore::connect(&aws_config)
            .await
            .context("failed to set up the DynamoDB session")?,
    );
    let schemas = Arc::new(SchemaCache::new(Arc::clone(&store)));
    let dispatcher = Dispatcher::with_schema_cache(Arc::clone(&store), Arc::clone(&schemas), &config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        let result = dispatcher
            .run(&args.join(" "))
            .await
            .context("statement failed")?;
        return print_result(&result);
    }

    spawn_warm_up(store, schemas, config.table_prefix.clone());
    run_interactive(&dispatcher).await
}
