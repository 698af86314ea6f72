//! HTTP transport layer
//!
//! [`ReqwestTransport`] performs single attempts; [`RetryingTransport`] wraps
//! any [`HttpTransport`] with the bounded retry policy.

pub mod client;
pub mod retry;
pub mod transport;

pub use client::{ReqwestTransport, ReqwestTransportBuilder};
pub use retry::RetryingTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
