//! Clearinghouse claims client
//!
//! Every operation follows the same path: map and validate locally, attach
//! bearer headers, dispatch through the retrying transport, then parse.
//! A `401` whose body mentions a token is answered with exactly one
//! invalidate, re-authenticate and resend cycle.

use std::sync::Arc;

use async_trait::async_trait;
use claimgate_core::{BundleMapper, BundleValidator, ClaimSubmitter, SubmissionReceipt};
use claimgate_domain::constants::{CLAIM_PATH, FHIR_JSON_CONTENT_TYPE, PAYMENT_NOTICE_PATH};
use claimgate_domain::{
    Bundle, ClaimGateError, ClaimPayload, ClaimStatusCode, ClaimStatusReport, ConnectorConfig,
    PaymentReconciliation, Result,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::auth::{Clock, TokenManager};
use crate::errors::InfraError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, RetryingTransport};

/// Client for the clearinghouse claim, pre-authorization, status and
/// payment-notice endpoints.
pub struct ClaimsClient {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenManager,
    base_url: String,
}

impl ClaimsClient {
    /// Build a client over the production reqwest transport with retry.
    ///
    /// # Errors
    /// Returns `ClaimGateError::Config` for an unusable configuration.
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let transport =
            RetryingTransport::new(ReqwestTransport::from_config(config)?, &config.retry);
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// The transport is used as given; wrap it in [`RetryingTransport`] to
    /// get the transient-failure budget.
    pub fn with_transport(config: &ConnectorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            tokens: TokenManager::new(config, Arc::clone(&transport)),
            transport,
            base_url: config.normalized_base_url().to_string(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tokens = self.tokens.with_clock(clock);
        self
    }

    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    /// Submit a claim as a transaction bundle.
    ///
    /// # Errors
    /// `Validation` before any network traffic when the claim has no items or
    /// the bundle is malformed; otherwise `Auth`, `Api` or `Transport`.
    #[instrument(skip(self, payload), fields(claim_number = %payload.claim_number))]
    pub async fn submit_claim(&self, payload: &ClaimPayload) -> Result<Value> {
        let bundle = Self::prepare(payload, BundleMapper::to_claim_bundle)?;
        let response = self.send_json(Method::POST, CLAIM_PATH, &bundle).await?;
        info!("claim submitted");
        Ok(response)
    }

    /// Request pre-authorization for the services in `payload`.
    ///
    /// Same pipeline as [`submit_claim`](Self::submit_claim), with the claim
    /// resource flagged `use = preauthorization`.
    #[instrument(skip(self, payload), fields(claim_number = %payload.claim_number))]
    pub async fn request_pre_auth(&self, payload: &ClaimPayload) -> Result<Value> {
        let bundle = Self::prepare(payload, BundleMapper::to_pre_auth_bundle)?;
        let response = self.send_json(Method::POST, CLAIM_PATH, &bundle).await?;
        info!("pre-authorization requested");
        Ok(response)
    }

    /// Look up a submitted claim and translate its remote status.
    ///
    /// # Errors
    /// `InvalidInput` for an empty id; otherwise `Auth`, `Api` or `Transport`.
    #[instrument(skip(self))]
    pub async fn check_status(&self, claim_id: &str) -> Result<ClaimStatusReport> {
        if claim_id.trim().is_empty() {
            return Err(ClaimGateError::InvalidInput("claim id must not be empty".into()));
        }

        let path = format!("{CLAIM_PATH}/{}", urlencoding::encode(claim_id));
        let response = self.execute(Method::GET, &path, None).await?;
        let remote = response.get("status").and_then(Value::as_str);
        let status = ClaimStatusCode::from_remote_status(remote);

        debug!(%status, "claim status resolved");
        Ok(ClaimStatusReport { status, claim_id: claim_id.to_string() })
    }

    /// Send a payment notice reconciling a remittance against a claim.
    #[instrument(skip(self, payment), fields(claim_number = %payment.claim_number))]
    pub async fn reconcile_payment(&self, payment: &PaymentReconciliation) -> Result<Value> {
        let notice = BundleMapper::to_payment_notice(payment);
        let response = self.send_json(Method::POST, PAYMENT_NOTICE_PATH, &notice).await?;
        info!("payment notice sent");
        Ok(response)
    }

    fn prepare(payload: &ClaimPayload, map: fn(&ClaimPayload) -> Bundle) -> Result<Bundle> {
        payload.ensure_submittable()?;
        let bundle = map(payload);
        BundleValidator::validate_bundle(&bundle)?;
        Ok(bundle)
    }

    async fn send_json<T: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        document: &T,
    ) -> Result<Value> {
        let body =
            serde_json::to_vec(document).map_err(|e| ClaimGateError::from(InfraError::from(e)))?;
        self.execute(method, path, Some(body)).await
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        let build = |headers: HeaderMap| {
            let request = HttpRequest::new(method.clone(), url.clone()).with_headers(headers);
            match &body {
                Some(body) => request.with_body(body.clone()),
                None => request,
            }
        };

        let mut response = self.transport.send(build(self.auth_headers().await?)).await?;

        if is_token_rejection(&response) {
            warn!(%url, "access token rejected, re-authenticating once");
            self.tokens.invalidate().await;
            response = self.transport.send(build(self.auth_headers().await?)).await?;
        }

        parse_response(response)
    }

    async fn auth_headers(&self) -> Result<HeaderMap> {
        let token = self.tokens.get_token().await?;
        let bearer = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            ClaimGateError::Auth("access token contains characters not allowed in a header".into())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FHIR_JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(FHIR_JSON_CONTENT_TYPE));
        Ok(headers)
    }
}

#[async_trait]
impl ClaimSubmitter for ClaimsClient {
    async fn submit(&self, payload: &ClaimPayload) -> Result<SubmissionReceipt> {
        let response = self.submit_claim(payload).await?;
        Ok(SubmissionReceipt { claim_number: payload.claim_number.clone(), response })
    }
}

fn is_token_rejection(response: &HttpResponse) -> bool {
    response.status == StatusCode::UNAUTHORIZED && response.body.to_lowercase().contains("token")
}

/// Non-success statuses become `Api` errors; success bodies must be JSON
/// (an empty body reads as `null`).
fn parse_response(response: HttpResponse) -> Result<Value> {
    let HttpResponse { status, body } = response;

    if !status.is_success() {
        warn!(status = status.as_u16(), "clearinghouse rejected request");
        return Err(ClaimGateError::Api { status: status.as_u16(), body });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|_| ClaimGateError::Api { status: status.as_u16(), body })
}
