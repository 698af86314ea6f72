//! Clearinghouse authentication

pub mod clock;
pub mod token_manager;

pub use clock::{Clock, MockClock, SystemClock};
pub use token_manager::TokenManager;
