//! Configuration loader
//!
//! Loads the connector configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whichever source wins, the result is validated before it is returned.
//!
//! ## Environment Variables
//! - `CLAIMGATE_BASE_URL`: Clearinghouse API base URL (required)
//! - `CLAIMGATE_CLIENT_ID`: OAuth client id (required)
//! - `CLAIMGATE_CLIENT_SECRET`: OAuth client secret (required)
//! - `CLAIMGATE_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `CLAIMGATE_VERIFY_TLS`: Certificate verification (true/false)
//! - `CLAIMGATE_MAX_RETRIES`: Retries after the first attempt
//! - `CLAIMGATE_BACKOFF_BASE_MS`: Linear backoff base in milliseconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./claimgate.json` or `./claimgate.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent directory
//! 4. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use claimgate_domain::{ClaimGateError, ConnectorConfig, Result};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["claimgate.json", "claimgate.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ClaimGateError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<ConnectorConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The base URL and client credentials are required; the remaining settings
/// fall back to their defaults when unset.
///
/// # Errors
/// Returns `ClaimGateError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<ConnectorConfig> {
    let mut config = ConnectorConfig::new(
        env_var("CLAIMGATE_BASE_URL")?,
        env_var("CLAIMGATE_CLIENT_ID")?,
        env_var("CLAIMGATE_CLIENT_SECRET")?,
    );

    if let Some(timeout) = env_parse::<u64>("CLAIMGATE_TIMEOUT_SECS")? {
        config.timeout_secs = timeout;
    }
    config.verify_tls = env_bool("CLAIMGATE_VERIFY_TLS", true);
    if let Some(retries) = env_parse::<usize>("CLAIMGATE_MAX_RETRIES")? {
        config.retry.max_retries = retries;
    }
    if let Some(backoff) = env_parse::<u64>("CLAIMGATE_BACKOFF_BASE_MS")? {
        config.retry.backoff_base_ms = backoff;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ClaimGateError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ConnectorConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ClaimGateError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ClaimGateError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ClaimGateError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ConnectorConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| ClaimGateError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ClaimGateError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ClaimGateError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd.clone());
        roots.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `ClaimGateError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ClaimGateError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `ClaimGateError::Config` if the variable is set but unparsable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ClaimGateError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
