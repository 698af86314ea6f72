//! OAuth2 client-credentials token manager
//!
//! Manages the access token lifecycle:
//! - Acquisition from the token endpoint (form-encoded client credentials)
//! - In-memory caching with a refresh margin before expiry
//! - Forced invalidation after the clearinghouse rejects a token
//!
//! The cache lock is held across the token round trip, so concurrent callers
//! that find the cache stale wait for one refresh instead of racing.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use claimgate_domain::constants::{
    DEFAULT_TOKEN_LIFETIME_SECS, DEFAULT_TOKEN_REFRESH_MARGIN_SECS, TOKEN_PATH,
};
use claimgate_domain::{ClaimGateError, ConnectorConfig, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use crate::http::{HttpRequest, HttpTransport};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Usable only while expiry is strictly beyond `now + margin`.
    fn is_fresh(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        now.checked_add_signed(margin).is_some_and(|limit| self.expires_at > limit)
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// Client-credentials token manager
///
/// Exclusively owns the cached token; callers only ever see the access token
/// string.
pub struct TokenManager {
    transport: Arc<dyn HttpTransport>,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_margin: Duration,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(config: &ConnectorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token_url: format!("{}{}", config.normalized_base_url(), TOKEN_PATH),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_margin: Duration::try_seconds(config.token_refresh_margin_secs)
                .unwrap_or_else(|| Duration::seconds(DEFAULT_TOKEN_REFRESH_MARGIN_SECS)),
            clock: Arc::new(SystemClock),
            cached: Mutex::new(None),
        }
    }

    /// Replace the system clock, e.g. with a mock in tests
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return a valid access token, fetching a new one when the cache is
    /// empty or within the refresh margin of expiry.
    ///
    /// # Errors
    /// Returns `ClaimGateError::Auth` if the token endpoint is unreachable,
    /// answers with a non-success status, omits `access_token`, or issues a
    /// token whose lifetime does not clear the refresh margin. A previously
    /// cached token is left in place.
    pub async fn get_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(self.clock.now(), self.refresh_margin) {
                return Ok(token.access_token.clone());
            }
            debug!(expires_at = %token.expires_at, "cached token within refresh margin");
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token so the next [`get_token`](Self::get_token)
    /// re-authenticates.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
        debug!("cached token invalidated");
    }

    /// Expiry of the cached token, if any
    pub async fn cached_expiry(&self) -> Option<DateTime<Utc>> {
        self.cached.lock().await.as_ref().map(|t| t.expires_at)
    }

    async fn fetch_token(&self) -> Result<CachedToken> {
        let requested_at = self.clock.now();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        let request = HttpRequest::post(&self.token_url)
            .with_headers(headers)
            .with_body(self.form_body().into_bytes());

        let response = self.transport.send(request).await.map_err(|err| {
            warn!(url = %self.token_url, error = %err, "token request failed");
            ClaimGateError::Auth(format!("token request failed: {err}"))
        })?;

        if !response.is_success() {
            warn!(
                url = %self.token_url,
                status = %response.status,
                "token endpoint rejected the request"
            );
            return Err(ClaimGateError::Auth(format!(
                "token endpoint returned {}",
                response.status.as_u16()
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|err| ClaimGateError::Auth(format!("malformed token response: {err}")))?;

        let access_token = parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClaimGateError::Auth("token response missing access_token".into()))?;
        let lifetime = parsed.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let expires_at = Duration::try_seconds(lifetime)
            .and_then(|lifetime| requested_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                ClaimGateError::Auth(format!("token expires_in out of range: {lifetime}"))
            })?;

        let token = CachedToken { access_token, expires_at };
        if !token.is_fresh(self.clock.now(), self.refresh_margin) {
            warn!(%expires_at, "token endpoint issued a token inside the refresh margin");
            return Err(ClaimGateError::Auth(format!(
                "token lifetime of {lifetime}s does not clear the refresh margin"
            )));
        }

        info!(%expires_at, "access token acquired");
        Ok(token)
    }

    fn form_body(&self) -> String {
        format!(
            "grant_type=client_credentials&client_id={}&client_secret={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.client_secret)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use claimgate_domain::ErrorKind;
    use reqwest::StatusCode;

    use super::*;
    use crate::auth::clock::MockClock;
    use crate::http::HttpResponse;

    #[derive(Default)]
    struct FakeTokenEndpoint {
        responses: StdMutex<VecDeque<Result<HttpResponse>>>,
        requests: StdMutex<Vec<HttpRequest>>,
        delay: Option<std::time::Duration>,
    }

    impl FakeTokenEndpoint {
        fn answering(responses: Vec<Result<HttpResponse>>) -> Arc<Self> {
            Arc::new(Self { responses: StdMutex::new(responses.into()), ..Default::default() })
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTokenEndpoint {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClaimGateError::transport("no scripted response")))
        }
    }

    fn token(access_token: &str, expires_in: i64) -> Result<HttpResponse> {
        Ok(HttpResponse::new(
            StatusCode::OK,
            format!(r#"{{"access_token":"{access_token}","expires_in":{expires_in}}}"#),
        ))
    }

    fn manager(endpoint: Arc<FakeTokenEndpoint>, clock: Arc<MockClock>) -> TokenManager {
        let config = ConnectorConfig::new("https://clearinghouse.test/api/", "client one", "s3cr&t");
        TokenManager::new(&config, endpoint).with_clock(clock)
    }

    #[tokio::test]
    async fn caches_token_until_refresh_margin() {
        let endpoint = FakeTokenEndpoint::answering(vec![token("A", 3600), token("B", 3600)]);
        let clock = Arc::new(MockClock::default());
        let manager = manager(endpoint.clone(), clock.clone());

        assert_eq!(manager.get_token().await.unwrap(), "A");
        clock.advance(Duration::seconds(3539));
        assert_eq!(manager.get_token().await.unwrap(), "A");
        assert_eq!(endpoint.calls(), 1);

        // 60s before expiry the token is no longer handed out.
        clock.advance(Duration::seconds(1));
        assert_eq!(manager.get_token().await.unwrap(), "B");
        assert_eq!(endpoint.calls(), 2);
    }

    #[tokio::test]
    async fn posts_form_encoded_client_credentials() {
        let endpoint = FakeTokenEndpoint::answering(vec![token("A", 3600)]);
        let manager = manager(endpoint.clone(), Arc::new(MockClock::default()));

        manager.get_token().await.unwrap();

        let requests = endpoint.requests.lock().unwrap();
        let request = &requests[0];
        assert_eq!(request.method, reqwest::Method::POST);
        assert_eq!(request.url, "https://clearinghouse.test/api/oauth/token");
        assert_eq!(request.headers[CONTENT_TYPE], FORM_CONTENT_TYPE);
        assert_eq!(
            String::from_utf8(request.body.clone().unwrap()).unwrap(),
            "grant_type=client_credentials&client_id=client%20one&client_secret=s3cr%26t"
        );
    }

    #[tokio::test]
    async fn missing_expires_in_defaults_to_an_hour() {
        let endpoint = FakeTokenEndpoint::answering(vec![Ok(HttpResponse::new(
            StatusCode::OK,
            r#"{"access_token":"A"}"#,
        ))]);
        let clock = Arc::new(MockClock::default());
        let manager = manager(endpoint, clock.clone());

        let started = clock.now();
        manager.get_token().await.unwrap();

        assert_eq!(manager.cached_expiry().await, Some(started + Duration::seconds(3600)));
    }

    #[tokio::test]
    async fn missing_access_token_is_auth_error() {
        let endpoint = FakeTokenEndpoint::answering(vec![Ok(HttpResponse::new(
            StatusCode::OK,
            r#"{"expires_in":3600}"#,
        ))]);
        let manager = manager(endpoint, Arc::new(MockClock::default()));

        let err = manager.get_token().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(manager.cached_expiry().await, None);
    }

    #[tokio::test]
    async fn rejected_credentials_are_auth_error() {
        let endpoint = FakeTokenEndpoint::answering(vec![Ok(HttpResponse::new(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"invalid_client"}"#,
        ))]);
        let manager = manager(endpoint, Arc::new(MockClock::default()));

        let err = manager.get_token().await.unwrap_err();
        assert!(matches!(err, ClaimGateError::Auth(msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn transport_failure_is_auth_error() {
        let endpoint = FakeTokenEndpoint::answering(vec![Err(ClaimGateError::transport_exhausted(
            4,
            503,
            "unavailable",
        ))]);
        let manager = manager(endpoint, Arc::new(MockClock::default()));

        assert_eq!(manager.get_token().await.unwrap_err().kind(), ErrorKind::Auth);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_token() {
        let endpoint = FakeTokenEndpoint::answering(vec![
            token("A", 120),
            Ok(HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "down")),
        ]);
        let clock = Arc::new(MockClock::default());
        let manager = manager(endpoint, clock.clone());

        manager.get_token().await.unwrap();
        let expiry = manager.cached_expiry().await;
        clock.advance(Duration::seconds(61));

        assert!(manager.get_token().await.is_err());
        assert_eq!(manager.cached_expiry().await, expiry);
    }

    #[tokio::test]
    async fn out_of_range_expires_in_is_auth_error() {
        let endpoint = FakeTokenEndpoint::answering(vec![token("A", 9_000_000_000_000)]);
        let manager = manager(endpoint, Arc::new(MockClock::default()));

        let err = manager.get_token().await.unwrap_err();
        assert!(matches!(err, ClaimGateError::Auth(msg) if msg.contains("out of range")));
        assert_eq!(manager.cached_expiry().await, None);
    }

    #[tokio::test]
    async fn token_inside_refresh_margin_is_rejected() {
        let endpoint = FakeTokenEndpoint::answering(vec![
            token("A", 3600),
            token("SHORT", 30),
            token("C", 3600),
        ]);
        let clock = Arc::new(MockClock::default());
        let manager = manager(endpoint.clone(), clock.clone());

        manager.get_token().await.unwrap();
        let expiry = manager.cached_expiry().await;
        clock.advance(Duration::seconds(3541));

        assert_eq!(manager.get_token().await.unwrap_err().kind(), ErrorKind::Auth);
        assert_eq!(manager.cached_expiry().await, expiry);

        assert_eq!(manager.get_token().await.unwrap(), "C");
        assert_eq!(endpoint.calls(), 3);
    }

    #[test]
    fn freshness_check_saturates_near_max_time() {
        let token = CachedToken { access_token: "A".into(), expires_at: DateTime::<Utc>::MAX_UTC };
        let now = DateTime::<Utc>::MAX_UTC - Duration::seconds(10);

        assert!(!token.is_fresh(now, Duration::seconds(60)));
        assert!(token.is_fresh(now, Duration::seconds(5)));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let endpoint = FakeTokenEndpoint::answering(vec![token("A", 3600), token("B", 3600)]);
        let manager = manager(endpoint.clone(), Arc::new(MockClock::default()));

        assert_eq!(manager.get_token().await.unwrap(), "A");
        manager.invalidate().await;
        assert_eq!(manager.get_token().await.unwrap(), "B");
        assert_eq!(endpoint.calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        let endpoint = Arc::new(FakeTokenEndpoint {
            responses: StdMutex::new(vec![token("A", 3600)].into()),
            delay: Some(std::time::Duration::from_millis(20)),
            ..Default::default()
        });
        let manager = Arc::new(manager(endpoint.clone(), Arc::new(MockClock::default())));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.get_token().await })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "A");
        }

        assert_eq!(endpoint.calls(), 1);
    }
}
