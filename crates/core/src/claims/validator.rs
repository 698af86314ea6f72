//! Structural bundle validation
//!
//! A local, network-free guard run before every submission. Checks are
//! applied in document order and the first violation is reported:
//! 1. `resourceType` equals `Bundle`
//! 2. `type` is present and a string
//! 3. `entry` is a non-empty array
//! 4. every entry carries a `resource` object with a string `resourceType`

use claimgate_domain::constants::BUNDLE_RESOURCE_TYPE;
use claimgate_domain::{Bundle, ClaimGateError, Result};
use serde_json::Value;

/// Bundle validator
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleValidator;

impl BundleValidator {
    /// Validate a typed bundle through its JSON form
    ///
    /// # Errors
    /// Returns `ClaimGateError::Validation` describing the first violation.
    pub fn validate_bundle(bundle: &Bundle) -> Result<()> {
        Self::validate(&bundle.to_json()?)
    }

    /// Validate an arbitrary JSON document against the bundle schema
    ///
    /// # Errors
    /// Returns `ClaimGateError::Validation` describing the first violation.
    pub fn validate(document: &Value) -> Result<()> {
        let root = document.as_object().ok_or_else(|| invalid("bundle must be a JSON object"))?;

        match root.get("resourceType") {
            Some(Value::String(rt)) if rt == BUNDLE_RESOURCE_TYPE => {}
            Some(other) => {
                return Err(invalid(format!("resourceType must be \"Bundle\", found {other}")))
            }
            None => return Err(invalid("'resourceType' is a required property")),
        }

        match root.get("type") {
            Some(Value::String(_)) => {}
            Some(other) => return Err(invalid(format!("type must be a string, found {other}"))),
            None => return Err(invalid("'type' is a required property")),
        }

        let entries = match root.get("entry") {
            Some(Value::Array(entries)) => entries,
            Some(other) => return Err(invalid(format!("entry must be an array, found {other}"))),
            None => return Err(invalid("'entry' is a required property")),
        };
        if entries.is_empty() {
            return Err(invalid("entry must contain at least one element"));
        }

        for (index, entry) in entries.iter().enumerate() {
            Self::validate_entry(index, entry)?;
        }

        Ok(())
    }

    fn validate_entry(index: usize, entry: &Value) -> Result<()> {
        let entry =
            entry.as_object().ok_or_else(|| invalid(format!("entry[{index}] must be an object")))?;

        let resource = match entry.get("resource") {
            Some(Value::Object(resource)) => resource,
            Some(other) => {
                return Err(invalid(format!(
                    "entry[{index}].resource must be an object, found {other}"
                )))
            }
            None => {
                return Err(invalid(format!("entry[{index}]: 'resource' is a required property")))
            }
        };

        match resource.get("resourceType") {
            Some(Value::String(_)) => Ok(()),
            _ => Err(invalid(format!(
                "entry[{index}].resource must declare a string resourceType"
            ))),
        }
    }
}

fn invalid(message: impl Into<String>) -> ClaimGateError {
    ClaimGateError::Validation(format!("FHIR payload validation failed: {}", message.into()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_bundle() -> Value {
        json!({
            "resourceType": "Bundle",
            "type": "transaction",
            "entry": [{
                "fullUrl": "urn:uuid:TEST-CLAIM-PNEUMONIA",
                "resource": {
                    "resourceType": "Claim",
                    "status": "active",
                    "use": "claim",
                    "patient": {"reference": "Patient/PATIENT-001"},
                    "item": [{
                        "sequence": 1,
                        "productOrService": {
                            "coding": [{
                                "system": "http://hl7.org/fhir/sid/icd-10",
                                "code": "J18.9",
                                "display": "Pneumonia, unspecified"
                            }]
                        }
                    }]
                },
                "request": {"method": "POST", "url": "Claim"}
            }]
        })
    }

    fn message(result: Result<()>) -> String {
        match result {
            Err(ClaimGateError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_well_formed_bundle() {
        assert!(BundleValidator::validate(&sample_bundle()).is_ok());
    }

    #[test]
    fn rejects_missing_type() {
        let mut bundle = sample_bundle();
        bundle.as_object_mut().unwrap().remove("type");

        assert!(message(BundleValidator::validate(&bundle)).contains("'type'"));
    }

    #[test]
    fn rejects_wrong_resource_type() {
        let mut bundle = sample_bundle();
        bundle["resourceType"] = json!("Claim");

        assert!(message(BundleValidator::validate(&bundle)).contains("resourceType"));
    }

    #[test]
    fn rejects_empty_entry() {
        let bundle = json!({"resourceType": "Bundle", "type": "transaction", "entry": []});
        assert!(message(BundleValidator::validate(&bundle)).contains("at least one"));
    }

    #[test]
    fn rejects_entry_without_resource() {
        let mut bundle = sample_bundle();
        bundle["entry"][0].as_object_mut().unwrap().remove("resource");

        assert!(message(BundleValidator::validate(&bundle)).contains("entry[0]"));
    }

    #[test]
    fn rejects_non_object_resource() {
        let mut bundle = sample_bundle();
        bundle["entry"][0]["resource"] = json!("Claim");

        assert!(message(BundleValidator::validate(&bundle)).contains("must be an object"));
    }

    #[test]
    fn reports_first_violation_only() {
        // Both `type` and `entry` are missing; only `type` is reported.
        let bundle = json!({"resourceType": "Bundle"});
        let msg = message(BundleValidator::validate(&bundle));

        assert!(msg.contains("'type'"));
        assert!(!msg.contains("entry"));
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(BundleValidator::validate(&json!([1, 2, 3])).is_err());
    }
}
