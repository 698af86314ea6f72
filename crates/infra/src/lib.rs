//! # ClaimGate Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP transport (reqwest) and the bounded retry layer
//! - OAuth2 client-credentials token management
//! - The clearinghouse claims client
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `claimgate-core`
//! - Depends on `claimgate-domain` and `claimgate-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod auth;
pub mod claims;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use auth::{Clock, MockClock, SystemClock, TokenManager};
pub use claims::ClaimsClient;
pub use errors::InfraError;
pub use http::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, ReqwestTransportBuilder,
    RetryingTransport,
};
