//! Autonomous-submission decision gate
//!
//! | Condition                                                   | Phase           |
//! |-------------------------------------------------------------|-----------------|
//! | complexity is low-complexity outpatient and score > 0.98     | AUTONOMOUS      |
//! | score > 0.90                                                 | SEMI_AUTONOMOUS |
//! | otherwise                                                    | CAC             |
//!
//! Comparisons are strict, so 0.98 and 0.90 fall through to the next tier.
//! A NaN score fails every comparison and lands in CAC. The outcome reports
//! the score rounded to two decimals; the gate always sees the raw mean.

use claimgate_domain::constants::{
    AUTONOMOUS_CONFIDENCE_THRESHOLD, CODING_ENGINE_VERSION, LOW_COMPLEXITY_OUTPATIENT,
    SEMI_AUTONOMOUS_CONFIDENCE_THRESHOLD,
};
use claimgate_domain::{CodingResult, DecisionOutcome, DecisionPhase, EncounterMeta};

/// Total decision function over coding results
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionGate;

impl DecisionGate {
    pub fn phase_for(confidence_score: f64, visit_complexity: &str) -> DecisionPhase {
        if visit_complexity == LOW_COMPLEXITY_OUTPATIENT
            && confidence_score > AUTONOMOUS_CONFIDENCE_THRESHOLD
        {
            DecisionPhase::Autonomous
        } else if confidence_score > SEMI_AUTONOMOUS_CONFIDENCE_THRESHOLD {
            DecisionPhase::SemiAutonomous
        } else {
            DecisionPhase::Cac
        }
    }

    /// Build the outcome of a coding run; never fails
    pub fn evaluate(result: &CodingResult, encounter: &EncounterMeta) -> DecisionOutcome {
        let phase = Self::phase_for(result.confidence_score(), &encounter.visit_complexity);
        let final_codes = match phase {
            DecisionPhase::Autonomous => result.suggested_codes().to_vec(),
            DecisionPhase::SemiAutonomous | DecisionPhase::Cac => Vec::new(),
        };

        DecisionOutcome {
            engine_version: CODING_ENGINE_VERSION.to_string(),
            phase,
            status: phase.status(),
            final_codes,
            suggested_codes: result.suggested_codes().to_vec(),
            confidence_score: round_to_hundredths(result.confidence_score()),
        }
    }
}

fn round_to_hundredths(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
