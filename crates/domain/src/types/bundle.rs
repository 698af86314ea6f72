//! Clinical-exchange bundle shapes
//!
//! Only the subset of the FHIR resources needed to submit a claim is modelled.
//! Field names follow the FHIR JSON spelling on the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{ClaimGateError, Result};

/// Transaction bundle sent to the clearinghouse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,
    #[serde(rename = "type")]
    pub bundle_type: String,
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// JSON form of the bundle, as validated and transmitted
    ///
    /// # Errors
    /// Returns `ClaimGateError::Internal` if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self)
            .map_err(|e| ClaimGateError::Internal(format!("Failed to serialize bundle: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: ClaimResource,
    pub request: BundleRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRequest {
    pub method: String,
    pub url: String,
}

/// FHIR `Claim` resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResource {
    pub resource_type: String,
    pub status: String,
    /// `claim` or `preauthorization`
    #[serde(rename = "use")]
    pub claim_use: String,
    pub patient: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Reference>,
    pub item: Vec<ClaimLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimLine {
    /// 1-based position of the line in the claim
    pub sequence: u32,
    pub product_or_service: CodeableConcept,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    pub display: String,
}

/// Literal reference (`Patient/<id>`) or logical reference by identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
}

impl Reference {
    pub fn literal(reference: impl Into<String>) -> Self {
        Self { reference: Some(reference.into()), identifier: None }
    }

    pub fn by_identifier(value: impl Into<String>) -> Self {
        Self { reference: None, identifier: Some(Identifier { value: value.into() }) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    pub currency: String,
}
