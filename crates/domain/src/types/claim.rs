//! Internal claim representation and status reporting

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, RESOURCE_STATUS_ACTIVE};
use crate::errors::{ClaimGateError, Result};
use crate::impl_wire_code_conversions;

/// Claim as produced by the coding workflow, before bundle mapping.
///
/// `claim_number` doubles as the idempotency key: every retry of the same
/// logical submission must reuse it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPayload {
    pub claim_number: String,
    pub patient: PatientRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderRef>,
    /// Line items, in billing order
    pub items: Vec<ClaimItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: String,
}

/// Billing provider, identified by its commercial registration number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRef {
    pub registration_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItem {
    pub service_code: String,
    pub description: String,
}

impl ClaimItem {
    pub fn new(service_code: impl Into<String>, description: impl Into<String>) -> Self {
        Self { service_code: service_code.into(), description: description.into() }
    }
}

impl ClaimPayload {
    pub fn new(
        claim_number: impl Into<String>,
        patient_id: impl Into<String>,
        items: Vec<ClaimItem>,
        total: Decimal,
    ) -> Self {
        Self {
            claim_number: claim_number.into(),
            patient: PatientRef { id: patient_id.into() },
            provider: None,
            items,
            total,
            currency: default_currency(),
        }
    }

    #[must_use]
    pub fn with_provider(mut self, registration_number: impl Into<String>) -> Self {
        self.provider = Some(ProviderRef { registration_number: registration_number.into() });
        self
    }

    /// Check the invariants a claim must hold before it is mapped and sent
    ///
    /// # Errors
    /// Returns `ClaimGateError::Validation` for the first violated invariant.
    pub fn ensure_submittable(&self) -> Result<()> {
        if self.claim_number.trim().is_empty() {
            return Err(ClaimGateError::Validation("claimNumber must not be empty".into()));
        }
        if self.items.is_empty() {
            return Err(ClaimGateError::Validation(format!(
                "claim {} has no items",
                self.claim_number
            )));
        }
        Ok(())
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Caller-facing claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimStatusCode {
    /// Claim accepted and active at the clearinghouse
    #[serde(rename = "FC_3")]
    Fc3,
    #[serde(rename = "PENDING")]
    Pending,
}

impl_wire_code_conversions!(ClaimStatusCode {
    Fc3 => "FC_3",
    Pending => "PENDING",
});

impl ClaimStatusCode {
    /// Translate the clearinghouse's raw status field.
    ///
    /// Policy table, not a protocol contract: only `active` is recognised.
    pub fn from_remote_status(raw: Option<&str>) -> Self {
        match raw {
            Some(RESOURCE_STATUS_ACTIVE) => Self::Fc3,
            _ => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatusReport {
    pub status: ClaimStatusCode,
    pub claim_id: String,
}
