//! Domain types and models

pub mod bundle;
pub mod claim;
pub mod coding;
pub mod payment;

pub use bundle::{
    Bundle, BundleEntry, BundleRequest, ClaimLine, ClaimResource, CodeableConcept, Coding,
    Identifier, Money, Reference,
};
pub use claim::{
    ClaimItem, ClaimPayload, ClaimStatusCode, ClaimStatusReport, PatientRef, ProviderRef,
};
pub use coding::{
    CodingResult, DecisionOutcome, DecisionPhase, EncounterMeta, OutcomeStatus, SuggestedCode,
};
pub use payment::{PaymentNotice, PaymentReconciliation};
