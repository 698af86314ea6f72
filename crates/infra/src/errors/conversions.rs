//! Conversions from external infrastructure errors into domain errors.

use claimgate_domain::ClaimGateError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ClaimGateError);

impl From<InfraError> for ClaimGateError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ClaimGateError> for InfraError {
    fn from(value: ClaimGateError) -> Self {
        InfraError(value)
    }
}

trait IntoClaimGateError {
    fn into_claimgate(self) -> ClaimGateError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ClaimGateError */
/* -------------------------------------------------------------------------- */

impl IntoClaimGateError for HttpError {
    fn into_claimgate(self) -> ClaimGateError {
        if self.is_timeout() {
            return ClaimGateError::transport("HTTP request timed out");
        }

        if self.is_connect() {
            return ClaimGateError::transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return ClaimGateError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            return ClaimGateError::Api {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or("unknown status").to_string(),
            };
        }

        ClaimGateError::transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_claimgate())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ClaimGateError */
/* -------------------------------------------------------------------------- */

impl IntoClaimGateError for JsonError {
    fn into_claimgate(self) -> ClaimGateError {
        if self.is_io() {
            return ClaimGateError::Internal(format!("JSON I/O failure: {self}"));
        }
        ClaimGateError::InvalidInput(format!("malformed JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_claimgate())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → ClaimGateError */
/* -------------------------------------------------------------------------- */

impl IntoClaimGateError for TomlError {
    fn into_claimgate(self) -> ClaimGateError {
        ClaimGateError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_claimgate())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
