//! Port interfaces for claim submission

use async_trait::async_trait;
use claimgate_domain::{ClaimPayload, Result};

/// Acknowledgement returned by the clearinghouse for a submitted claim
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub claim_number: String,
    /// Raw clearinghouse response body
    pub response: serde_json::Value,
}

/// Trait for irreversibly submitting a claim to the clearinghouse
///
/// Implementations must only return `Ok` once the remote side accepted the
/// claim; callers mark a claim as submitted on `Ok` alone.
#[async_trait]
pub trait ClaimSubmitter: Send + Sync {
    async fn submit(&self, payload: &ClaimPayload) -> Result<SubmissionReceipt>;
}
