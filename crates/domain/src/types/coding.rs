//! Coding results and automation decisions
//!
//! A [`CodingResult`] is produced by an external term-matching engine; the
//! connector only consumes it. A [`DecisionOutcome`] is the terminal value of
//! one coding run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_VISIT_COMPLEXITY;
use crate::impl_wire_code_conversions;

/// Candidate code proposed by the coding engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedCode {
    pub code: String,
    pub description: String,
    /// Engine confidence in `[0, 1]`
    pub confidence: f64,
}

impl SuggestedCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>, confidence: f64) -> Self {
        Self { code: code.into(), description: description.into(), confidence }
    }
}

/// Suggestions for one clinical note plus their aggregate confidence
///
/// The aggregate is always recomputed from the suggestions, including on
/// deserialization, so it cannot drift from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawCodingResult")]
pub struct CodingResult {
    suggested_codes: Vec<SuggestedCode>,
    confidence_score: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCodingResult {
    #[serde(default)]
    suggested_codes: Vec<SuggestedCode>,
}

impl From<RawCodingResult> for CodingResult {
    fn from(raw: RawCodingResult) -> Self {
        Self::new(raw.suggested_codes)
    }
}

impl CodingResult {
    pub fn new(suggested_codes: Vec<SuggestedCode>) -> Self {
        let confidence_score = mean_confidence(&suggested_codes);
        Self { suggested_codes, confidence_score }
    }

    pub fn suggested_codes(&self) -> &[SuggestedCode] {
        &self.suggested_codes
    }

    /// Mean confidence across suggestions; exactly `0.0` when there are none
    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn into_suggested_codes(self) -> Vec<SuggestedCode> {
        self.suggested_codes
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_confidence(codes: &[SuggestedCode]) -> f64 {
    if codes.is_empty() {
        return 0.0;
    }
    codes.iter().map(|c| c.confidence).sum::<f64>() / codes.len() as f64
}

/// Encounter metadata accompanying a coding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterMeta {
    pub id: String,
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_registration: Option<String>,
    #[serde(default = "default_visit_complexity")]
    pub visit_complexity: String,
    /// Billed amount for the encounter's claim
    #[serde(with = "rust_decimal::serde::float")]
    pub claim_total: Decimal,
}

impl EncounterMeta {
    pub fn new(
        id: impl Into<String>,
        patient_id: impl Into<String>,
        visit_complexity: impl Into<String>,
        claim_total: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            patient_id: patient_id.into(),
            provider_registration: None,
            visit_complexity: visit_complexity.into(),
            claim_total,
        }
    }
}

fn default_visit_complexity() -> String {
    DEFAULT_VISIT_COMPLEXITY.to_string()
}

/// Level of human involvement selected for a coding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionPhase {
    /// Codes accepted and the claim submitted without review
    Autonomous,
    /// Held for batch review
    SemiAutonomous,
    /// Computer-assisted coding: a coder reviews every suggestion
    Cac,
}

impl_wire_code_conversions!(DecisionPhase {
    Autonomous => "AUTONOMOUS",
    SemiAutonomous => "SEMI_AUTONOMOUS",
    Cac => "CAC",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    SentToClearinghouse,
    AutoDrop,
    NeedsReview,
}

impl_wire_code_conversions!(OutcomeStatus {
    SentToClearinghouse => "SENT_TO_CLEARINGHOUSE",
    AutoDrop => "AUTO_DROP",
    NeedsReview => "NEEDS_REVIEW",
});

impl DecisionPhase {
    /// Status that accompanies this phase in an outcome
    pub const fn status(self) -> OutcomeStatus {
        match self {
            Self::Autonomous => OutcomeStatus::SentToClearinghouse,
            Self::SemiAutonomous => OutcomeStatus::AutoDrop,
            Self::Cac => OutcomeStatus::NeedsReview,
        }
    }
}

/// Terminal result of one coding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub engine_version: String,
    pub phase: DecisionPhase,
    pub status: OutcomeStatus,
    /// Accepted codes; empty unless the phase is autonomous
    pub final_codes: Vec<SuggestedCode>,
    pub suggested_codes: Vec<SuggestedCode>,
    pub confidence_score: f64,
}

impl DecisionOutcome {
    pub fn triggers_submission(&self) -> bool {
        self.phase == DecisionPhase::Autonomous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_suggestions_score_exactly_zero() {
        let result = CodingResult::new(vec![]);
        assert_eq!(result.confidence_score(), 0.0);
        assert!(!result.confidence_score().is_nan());
    }

    #[test]
    fn score_is_mean_of_confidences() {
        let result = CodingResult::new(vec![
            SuggestedCode::new("I21.9", "Acute myocardial infarction", 0.99),
            SuggestedCode::new("K37", "Unspecified appendicitis", 0.95),
        ]);
        assert!((result.confidence_score() - 0.97).abs() < 1e-9);
    }

    #[test]
    fn deserialization_recomputes_score() {
        let json = r#"{
            "suggestedCodes": [{"code": "J18.9", "description": "Pneumonia", "confidence": 0.85}],
            "confidenceScore": 0.99
        }"#;
        let result: CodingResult = serde_json::from_str(json).unwrap();

        assert!((result.confidence_score() - 0.85).abs() < 1e-9);
    }

    #[test]
    fn phase_codes_round_trip_through_strings() {
        assert_eq!(DecisionPhase::SemiAutonomous.to_string(), "SEMI_AUTONOMOUS");
        assert_eq!("cac".parse::<DecisionPhase>().unwrap(), DecisionPhase::Cac);
        assert_eq!(
            serde_json::to_value(OutcomeStatus::SentToClearinghouse).unwrap(),
            "SENT_TO_CLEARINGHOUSE"
        );
    }

    #[test]
    fn encounter_defaults_visit_complexity() {
        let json = r#"{"id": "123", "patientId": "P-1", "claimTotal": 1000.0}"#;
        let encounter: EncounterMeta = serde_json::from_str(json).unwrap();

        assert_eq!(encounter.visit_complexity, "standard");
        assert_eq!(encounter.claim_total, Decimal::new(1000, 0));
    }
}
