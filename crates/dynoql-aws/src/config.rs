//! Connection settings for the AWS store.

use std::env;

/// Errors while setting up the AWS session.
#[derive(Debug, thiserror::Error)]
pub enum AwsStoreError {
    /// Only one half of a static key pair was supplied.
    #[error(
        "DYNOQL_ACCESS_KEY_ID and DYNOQL_SECRET_ACCESS_KEY must be set together"
    )]
    IncompleteCredentials,
    /// No region was configured anywhere.
    #[error("no region configured, set DYNOQL_REGION or AWS_REGION")]
    MissingRegion,
}

/// AWS store configuration.
#[derive(Debug, Clone, Default)]
pub struct AwsStoreConfig {
    /// Region; `None` defers to the SDK's provider chain.
    pub region: Option<String>,
    /// Endpoint override, e.g. a local DynamoDB.
    pub endpoint_url: Option<String>,
    /// Static access key id.
    pub access_key_id: Option<String>,
    /// Static secret access key.
    pub secret_access_key: Option<String>,
}

impl AwsStoreConfig {
    /// Create configuration from environment variables.
    ///
    /// The region comes from `DYNOQL_REGION`, then `AWS_REGION`, then
    /// `AWS_DEFAULT_REGION`. `DYNOQL_ENDPOINT_URL`, `DYNOQL_ACCESS_KEY_ID` and
    /// `DYNOQL_SECRET_ACCESS_KEY` are optional.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            region: first_env(&["DYNOQL_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"]),
            endpoint_url: first_env(&["DYNOQL_ENDPOINT_URL"]),
            access_key_id: first_env(&["DYNOQL_ACCESS_KEY_ID"]),
            secret_access_key: first_env(&["DYNOQL_SECRET_ACCESS_KEY"]),
        }
    }

    /// The static key pair, if one was configured.
    ///
    /// # Errors
    ///
    /// Returns [`AwsStoreError::IncompleteCredentials`] when only one half is set.
    pub fn static_credentials(&self) -> Result<Option<(&str, &str)>, AwsStoreError> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Ok(Some((id.as_str(), secret.as_str()))),
            (None, None) => Ok(None),
            _ => Err(AwsStoreError::IncompleteCredentials),
        }
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_owned())
        .find(|v| !v.is_empty())
}
