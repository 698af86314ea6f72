//! Claim bundle mapping, validation and connector ports

pub mod mapper;
pub mod ports;
pub mod validator;

pub use mapper::BundleMapper;
pub use ports::*;
pub use validator::BundleValidator;
