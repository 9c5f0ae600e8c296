//! Statement engine configuration.

use std::env;

/// Native page size used for every scan call unless overridden.
pub const DEFAULT_SCAN_PAGE_SIZE: i32 = 100;

/// Statement engine configuration.
#[derive(Debug, Clone)]
pub struct DynoqlConfig {
    /// Native `Limit` sent with each page of a filtered scan.
    pub scan_page_size: i32,
    /// Only tables starting with this prefix are warmed up at start-up.
    pub table_prefix: Option<String>,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl DynoqlConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads `DYNOQL_SCAN_PAGE_SIZE`, `DYNOQL_TABLE_PREFIX` and `LOG_LEVEL`.
    /// Values that do not parse fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            scan_page_size: env_positive_i32("DYNOQL_SCAN_PAGE_SIZE", DEFAULT_SCAN_PAGE_SIZE),
            table_prefix: env_non_empty("DYNOQL_TABLE_PREFIX"),
            log_level: env_non_empty("LOG_LEVEL").unwrap_or_else(|| "warn".to_owned()),
        }
    }
}

impl Default for DynoqlConfig {
    fn default() -> Self {
        Self {
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            table_prefix: None,
            log_level: "warn".to_owned(),
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_positive_i32(key: &str, default: i32) -> i32 {
    env_non_empty(key)
        .and_then(|v| v.parse::<i32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}
