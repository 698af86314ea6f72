//! Connector constants
//!
//! Wire-level literals and policy thresholds shared by the mapper, the
//! validator, the decision gate and the HTTP client.

// Bundle shape
pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";
pub const BUNDLE_TYPE_TRANSACTION: &str = "transaction";
pub const CLAIM_RESOURCE_TYPE: &str = "Claim";
pub const PAYMENT_NOTICE_RESOURCE_TYPE: &str = "PaymentNotice";
pub const ICD10_SYSTEM: &str = "http://hl7.org/fhir/sid/icd-10";
pub const CLAIM_USE_CLAIM: &str = "claim";
pub const CLAIM_USE_PREAUTHORIZATION: &str = "preauthorization";
pub const RESOURCE_STATUS_ACTIVE: &str = "active";
pub const DEFAULT_CURRENCY: &str = "SAR";

// Endpoints (relative to the configured base URL)
pub const TOKEN_PATH: &str = "/oauth/token";
pub const CLAIM_PATH: &str = "/Claim";
pub const PAYMENT_NOTICE_PATH: &str = "/PaymentNotice";
pub const FHIR_JSON_CONTENT_TYPE: &str = "application/fhir+json";

// Authentication
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;
pub const DEFAULT_TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
pub const MAX_TOKEN_REFRESH_MARGIN_SECS: i64 = 86_400;

// Transport
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1000;
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

// Decision gate
pub const AUTONOMOUS_CONFIDENCE_THRESHOLD: f64 = 0.98;
pub const SEMI_AUTONOMOUS_CONFIDENCE_THRESHOLD: f64 = 0.90;
pub const LOW_COMPLEXITY_OUTPATIENT: &str = "low-complexity outpatient";
pub const DEFAULT_VISIT_COMPLEXITY: &str = "standard";
pub const CODING_ENGINE_VERSION: &str = "0.1.0";
