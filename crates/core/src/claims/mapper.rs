//! Internal claim → clinical-exchange bundle mapping
//!
//! Mapping is pure and deterministic: the same payload always yields a
//! structurally identical bundle, with line items numbered from 1 in input
//! order. Identifiers are embedded verbatim.

use claimgate_domain::constants::{
    BUNDLE_RESOURCE_TYPE, BUNDLE_TYPE_TRANSACTION, CLAIM_RESOURCE_TYPE, CLAIM_USE_CLAIM,
    CLAIM_USE_PREAUTHORIZATION, ICD10_SYSTEM, PAYMENT_NOTICE_RESOURCE_TYPE,
    RESOURCE_STATUS_ACTIVE,
};
use claimgate_domain::{
    Bundle, BundleEntry, BundleRequest, ClaimItem, ClaimLine, ClaimPayload, ClaimResource,
    CodeableConcept, Coding, Money, PaymentNotice, PaymentReconciliation, Reference,
};

/// Maps claim, pre-authorization and payment payloads to exchange resources
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleMapper;

impl BundleMapper {
    /// Transaction bundle carrying a single `Claim` with `use = claim`
    pub fn to_claim_bundle(payload: &ClaimPayload) -> Bundle {
        Self::bundle_for(payload, CLAIM_USE_CLAIM)
    }

    /// Same shape as a claim bundle, flagged `use = preauthorization`
    pub fn to_pre_auth_bundle(payload: &ClaimPayload) -> Bundle {
        Self::bundle_for(payload, CLAIM_USE_PREAUTHORIZATION)
    }

    pub fn to_payment_notice(payment: &PaymentReconciliation) -> PaymentNotice {
        PaymentNotice {
            resource_type: PAYMENT_NOTICE_RESOURCE_TYPE.to_string(),
            status: RESOURCE_STATUS_ACTIVE.to_string(),
            request: Reference::literal(format!("{CLAIM_RESOURCE_TYPE}/{}", payment.claim_number)),
            payment: Reference::by_identifier(payment.payment_reference.clone()),
            payment_date: payment.payment_date,
            amount: Money { value: payment.amount, currency: payment.currency.clone() },
        }
    }

    fn bundle_for(payload: &ClaimPayload, claim_use: &str) -> Bundle {
        let resource = ClaimResource {
            resource_type: CLAIM_RESOURCE_TYPE.to_string(),
            status: RESOURCE_STATUS_ACTIVE.to_string(),
            claim_use: claim_use.to_string(),
            patient: Reference::literal(format!("Patient/{}", payload.patient.id)),
            provider: payload
                .provider
                .as_ref()
                .map(|p| Reference::by_identifier(p.registration_number.clone())),
            item: (1u32..).zip(&payload.items).map(|(seq, item)| Self::line(seq, item)).collect(),
            total: Some(Money { value: payload.total, currency: payload.currency.clone() }),
        };

        Bundle {
            resource_type: BUNDLE_RESOURCE_TYPE.to_string(),
            bundle_type: BUNDLE_TYPE_TRANSACTION.to_string(),
            entry: vec![BundleEntry {
                full_url: format!("urn:uuid:{}", payload.claim_number),
                resource,
                request: BundleRequest {
                    method: "POST".to_string(),
                    url: CLAIM_RESOURCE_TYPE.to_string(),
                },
            }],
        }
    }

    fn line(sequence: u32, item: &ClaimItem) -> ClaimLine {
        ClaimLine {
            sequence,
            product_or_service: CodeableConcept {
                coding: vec![Coding {
                    system: ICD10_SYSTEM.to_string(),
                    code: item.service_code.clone(),
                    display: item.description.clone(),
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    fn pneumonia_claim() -> ClaimPayload {
        ClaimPayload::new(
            "C-1",
            "P-1",
            vec![ClaimItem::new("J18.9", "Pneumonia")],
            Decimal::new(1000, 1),
        )
    }

    #[test]
    fn maps_single_item_claim() {
        let bundle = BundleMapper::to_claim_bundle(&pneumonia_claim());
        let json = bundle.to_json().unwrap();

        assert_eq!(json["resourceType"], "Bundle");
        assert_eq!(json["type"], "transaction");
        assert_eq!(json["entry"][0]["fullUrl"], "urn:uuid:C-1");
        assert_eq!(json["entry"][0]["request"]["method"], "POST");
        assert_eq!(json["entry"][0]["request"]["url"], "Claim");
        assert_eq!(json["entry"][0]["resource"]["use"], "claim");
        assert_eq!(json["entry"][0]["resource"]["patient"]["reference"], "Patient/P-1");
        assert_eq!(json["entry"][0]["resource"]["item"][0]["sequence"], 1);
        assert_eq!(
            json["entry"][0]["resource"]["item"][0]["productOrService"]["coding"][0]["code"],
            "J18.9"
        );
        assert_eq!(
            json["entry"][0]["resource"]["item"][0]["productOrService"]["coding"][0]["system"],
            ICD10_SYSTEM
        );
    }

    #[test]
    fn sequences_follow_input_order() {
        let mut payload = pneumonia_claim();
        payload.items = vec![
            ClaimItem::new("K37", "Appendicitis"),
            ClaimItem::new("A00", "Cholera"),
            ClaimItem::new("J18.9", "Pneumonia"),
        ];

        let bundle = BundleMapper::to_claim_bundle(&payload);
        let lines = &bundle.entry[0].resource.item;

        let observed: Vec<(u32, &str)> = lines
            .iter()
            .map(|l| (l.sequence, l.product_or_service.coding[0].code.as_str()))
            .collect();
        assert_eq!(observed, vec![(1, "K37"), (2, "A00"), (3, "J18.9")]);
    }

    #[test]
    fn mapping_is_deterministic() {
        let payload = pneumonia_claim().with_provider("CR-1");
        assert_eq!(BundleMapper::to_claim_bundle(&payload), BundleMapper::to_claim_bundle(&payload));
    }

    #[test]
    fn identifiers_are_embedded_verbatim() {
        let mut payload = pneumonia_claim();
        payload.patient.id = "P/1 ?x=ü".to_string();

        let bundle = BundleMapper::to_claim_bundle(&payload);
        assert_eq!(bundle.entry[0].resource.patient.reference.as_deref(), Some("Patient/P/1 ?x=ü"));
    }

    #[test]
    fn provider_and_total_are_mapped() {
        let bundle = BundleMapper::to_claim_bundle(&pneumonia_claim().with_provider("CR-42"));
        let resource = &bundle.entry[0].resource;

        let provider = resource.provider.as_ref().unwrap();
        assert_eq!(provider.identifier.as_ref().unwrap().value, "CR-42");
        assert_eq!(resource.total.as_ref().unwrap().value, Decimal::new(100, 0));
        assert_eq!(resource.total.as_ref().unwrap().currency, "SAR");
    }

    #[test]
    fn pre_auth_bundle_differs_only_in_use() {
        let payload = pneumonia_claim();
        let claim = BundleMapper::to_claim_bundle(&payload);
        let mut pre_auth = BundleMapper::to_pre_auth_bundle(&payload);

        assert_eq!(pre_auth.entry[0].resource.claim_use, "preauthorization");
        pre_auth.entry[0].resource.claim_use = "claim".to_string();
        assert_eq!(pre_auth, claim);
    }

    #[test]
    fn maps_payment_notice() {
        let payment = PaymentReconciliation {
            claim_number: "C-1".into(),
            payment_reference: "REM-2024-001".into(),
            amount: Decimal::new(9550, 2),
            currency: "SAR".into(),
            payment_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };

        let notice = BundleMapper::to_payment_notice(&payment);
        let json = serde_json::to_value(&notice).unwrap();

        assert_eq!(json["resourceType"], "PaymentNotice");
        assert_eq!(json["request"]["reference"], "Claim/C-1");
        assert_eq!(json["payment"]["identifier"]["value"], "REM-2024-001");
        assert_eq!(json["amount"]["value"], 95.5);
        assert_eq!(json["paymentDate"], "2024-03-01");
    }
}
