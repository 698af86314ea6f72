//! Error types used throughout the connector

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ClaimGate
///
/// The first four variants are the connector's failure surface. They never
/// overlap: callers branch on the variant (or on [`ClaimGateError::kind`])
/// rather than on message text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum ClaimGateError {
    /// A token could not be obtained from the authorization endpoint.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A bundle failed the structural check and was never sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The clearinghouse rejected the request with a terminal status.
    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// Connection failure, timeout, or an exhausted retry budget.
    #[error("Transport error: {message}")]
    Transport { message: String, status: Option<u16>, body: Option<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`ClaimGateError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    Validation,
    Api,
    Transport,
    Config,
    InvalidInput,
    Internal,
}

impl ClaimGateError {
    /// Transport failure that never produced a response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into(), status: None, body: None }
    }

    /// Transport failure carrying the last response seen before giving up.
    pub fn transport_exhausted(attempts: usize, status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            message: format!(
                "retry budget exhausted after {attempts} attempts (last status {status})"
            ),
            status: Some(status),
            body: Some(body.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Api { .. } => ErrorKind::Api,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Config,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status attached to the error, if the remote side answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for ClaimGate operations
pub type Result<T> = std::result::Result<T, ClaimGateError>;
