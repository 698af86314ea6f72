//! Coding automation: decision gate and submission pipeline

pub mod decision;
pub mod pipeline;

pub use decision::DecisionGate;
pub use pipeline::{claim_payload_for, CodingPipeline};
