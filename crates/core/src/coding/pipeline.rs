//! Coding pipeline - applies the decision gate and submits autonomous claims

use std::sync::Arc;

use claimgate_domain::{
    ClaimItem, ClaimPayload, CodingResult, DecisionOutcome, EncounterMeta, Result, SuggestedCode,
};
use tracing::{debug, info, warn};

use super::decision::DecisionGate;
use crate::claims::ports::ClaimSubmitter;

/// Build the claim an autonomous coding run submits for an encounter
pub fn claim_payload_for(encounter: &EncounterMeta, codes: &[SuggestedCode]) -> ClaimPayload {
    let items =
        codes.iter().map(|c| ClaimItem::new(c.code.clone(), c.description.clone())).collect();
    let payload = ClaimPayload::new(
        format!("CLAIM-{}", encounter.id),
        encounter.patient_id.clone(),
        items,
        encounter.claim_total,
    );

    match &encounter.provider_registration {
        Some(registration) => payload.with_provider(registration.clone()),
        None => payload,
    }
}

/// Pipeline that turns coding results into decisions
///
/// The pipeline is the only caller of [`ClaimSubmitter::submit`], and only on
/// the autonomous branch.
pub struct CodingPipeline {
    submitter: Arc<dyn ClaimSubmitter>,
}

impl CodingPipeline {
    pub fn new(submitter: Arc<dyn ClaimSubmitter>) -> Self {
        Self { submitter }
    }

    /// Decide on a coding run, submitting the claim when the gate allows it
    ///
    /// # Errors
    /// On the autonomous branch, returns the connector error if submission
    /// fails; no outcome is produced in that case, so the claim is never
    /// reported as sent.
    pub async fn run(
        &self,
        result: &CodingResult,
        encounter: &EncounterMeta,
    ) -> Result<DecisionOutcome> {
        let outcome = DecisionGate::evaluate(result, encounter);
        debug!(
            encounter_id = %encounter.id,
            phase = %outcome.phase,
            confidence = outcome.confidence_score,
            "coding run evaluated"
        );

        if !outcome.triggers_submission() {
            return Ok(outcome);
        }

        let payload = claim_payload_for(encounter, &outcome.final_codes);
        match self.submitter.submit(&payload).await {
            Ok(receipt) => {
                info!(
                    encounter_id = %encounter.id,
                    claim_number = %receipt.claim_number,
                    "claim submitted autonomously"
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!(
                    encounter_id = %encounter.id,
                    claim_number = %payload.claim_number,
                    error = %err,
                    "autonomous submission failed"
                );
                Err(err)
            }
        }
    }
}
