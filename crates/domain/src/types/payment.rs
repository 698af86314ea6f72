//! Payment reconciliation types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bundle::{Money, Reference};

/// Payment received for a previously submitted claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReconciliation {
    pub claim_number: String,
    /// Remittance or transfer reference issued by the payer
    pub payment_reference: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub payment_date: NaiveDate,
}

/// FHIR `PaymentNotice` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotice {
    pub resource_type: String,
    pub status: String,
    /// The claim being paid
    pub request: Reference,
    pub payment: Reference,
    pub payment_date: NaiveDate,
    pub amount: Money,
}

fn default_currency() -> String {
    crate::constants::DEFAULT_CURRENCY.to_string()
}
