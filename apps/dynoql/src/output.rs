//! Plain JSON rendering of statement results.

use anyhow::{Context, Result};
use serde_json::Value;

use dynoql_core::StatementResult;
use dynoql_model::Item;

/// Render a result for stdout. Blank input renders nothing.
pub fn render(result: &StatementResult) -> Result<Option<String>> {
    let text = match result {
        StatementResult::Empty => return Ok(None),
        StatementResult::Items(items) => {
            let rows = Value::Array(items.iter().map(plain_item).collect());
            format!("{}\n{}", pretty(&rows)?, count_suffix(items.len()))
        }
        StatementResult::Item(Some(item)) => pretty(&plain_item(item))?,
        StatementResult::Item(None) => "no item found".to_owned(),
        StatementResult::Table(schema) => serde_json::to_string_pretty(&schema.description)
            .context("failed to render table description")?,
    };
    Ok(Some(text))
}

/// `1 item` or `N items`.
pub fn count_suffix(count: usize) -> String {
    if count == 1 {
        "1 item".to_owned()
    } else {
        format!("{count} items")
    }
}

fn plain_item(item: &Item) -> Value {
    let mut fields: Vec<_> = item.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k.clone(), v.to_plain_json()))
            .collect(),
    )
}

fn pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to render result")
}
