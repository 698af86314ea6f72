//! Clearinghouse claims connector

pub mod client;

pub use client::ClaimsClient;
