//! # ClaimGate Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Bundle mapping and structural validation
//! - The autonomous-submission decision gate
//! - Port interfaces (traits) for the clearinghouse connector
//!
//! ## Architecture Principles
//! - Only depends on `claimgate-domain`
//! - No HTTP, storage or platform code
//! - All external dependencies via traits

pub mod claims;
pub mod coding;

pub use claims::ports::{ClaimSubmitter, SubmissionReceipt};
pub use claims::{BundleMapper, BundleValidator};
pub use coding::{claim_payload_for, CodingPipeline, DecisionGate};
