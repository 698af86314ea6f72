//! # ClaimGate Domain
//!
//! Business domain types and models for the clearinghouse claims connector.
//!
//! This crate contains:
//! - Claim, bundle and payment data types
//! - Coding results and decision outcomes
//! - Domain error types and Result definitions
//! - Connector configuration structures
//!
//! ## Architecture
//! - No dependencies on other ClaimGate crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
