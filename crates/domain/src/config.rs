//! Connector configuration structures

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKOFF_BASE_MS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TOKEN_REFRESH_MARGIN_SECS, MAX_TOKEN_REFRESH_MARGIN_SECS,
};
use crate::errors::{ClaimGateError, Result};

/// Retry settings for transient clearinghouse failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (3 means at most 4 requests)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Delay before retry `n` is `n * backoff_base_ms`
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl RetryConfig {
    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, backoff_base_ms: DEFAULT_BACKOFF_BASE_MS }
    }
}

/// Construction parameters for the clearinghouse connector
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Base URL for the clearinghouse API (e.g. "https://sandbox.nphies.sa/api")
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Certificate verification; only disable against a sandbox
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Cached tokens closer than this to expiry are treated as expired
    #[serde(default = "default_token_refresh_margin_secs")]
    pub token_refresh_margin_secs: i64,
}

impl ConnectorConfig {
    /// Config with default timeout, retry and TLS settings
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
            retry: RetryConfig::default(),
            token_refresh_margin_secs: DEFAULT_TOKEN_REFRESH_MARGIN_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Reject configurations the connector cannot work with
    ///
    /// # Errors
    /// Returns `ClaimGateError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClaimGateError::Config("base_url must not be empty".into()));
        }
        if self.client_id.trim().is_empty() {
            return Err(ClaimGateError::Config("client_id must not be empty".into()));
        }
        if self.client_secret.is_empty() {
            return Err(ClaimGateError::Config("client_secret must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ClaimGateError::Config("timeout_secs must be greater than zero".into()));
        }
        if !(0..=MAX_TOKEN_REFRESH_MARGIN_SECS).contains(&self.token_refresh_margin_secs) {
            return Err(ClaimGateError::Config(format!(
                "token_refresh_margin_secs must be between 0 and {MAX_TOKEN_REFRESH_MARGIN_SECS}"
            )));
        }
        Ok(())
    }
}

// Hand-written so the client secret never reaches logs.
impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_tls", &self.verify_tls)
            .field("retry", &self.retry)
            .field("token_refresh_margin_secs", &self.token_refresh_margin_secs)
            .finish()
    }
}

fn default_max_retries() -> usize {
    DEFAULT_MAX_RETRIES
}

fn default_backoff_base_ms() -> u64 {
    DEFAULT_BACKOFF_BASE_MS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_verify_tls() -> bool {
    true
}

fn default_token_refresh_margin_secs() -> i64 {
    DEFAULT_TOKEN_REFRESH_MARGIN_SECS
}
