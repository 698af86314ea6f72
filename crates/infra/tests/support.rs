use std::sync::Once;

use claimgate_domain::{ClaimItem, ClaimPayload, ConnectorConfig};
use claimgate_infra::ClaimsClient;
use rust_decimal::Decimal;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/oauth/token";

/// Install a fmt subscriber once so `RUST_LOG=debug` shows client logs.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Connector config pointed at a mock server, with backoff disabled.
pub fn connector_config(server: &MockServer) -> ConnectorConfig {
    let mut config = ConnectorConfig::new(server.uri(), "test-client", "test-secret");
    config.timeout_secs = 2;
    config.retry.backoff_base_ms = 0;
    config
}

pub fn client_for(server: &MockServer) -> ClaimsClient {
    init_tracing();
    ClaimsClient::new(&connector_config(server)).expect("claims client should build")
}

/// Mount a token endpoint that hands out `access_token` for an hour.
pub async fn mount_token(server: &MockServer, access_token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Claim for a single pneumonia line item.
pub fn pneumonia_claim() -> ClaimPayload {
    ClaimPayload::new(
        "TEST-CLAIM-PNEUMONIA",
        "PATIENT-001",
        vec![ClaimItem::new("J18.9", "Pneumonia, unspecified")],
        Decimal::new(45000, 2),
    )
}

pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .expect("request recording should be enabled")
        .into_iter()
        .filter(|r| r.url.path() == request_path)
        .collect()
}
