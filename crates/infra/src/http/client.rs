use std::time::Duration;

use async_trait::async_trait;
use claimgate_domain::constants::DEFAULT_TIMEOUT_SECS;
use claimgate_domain::{ClaimGateError, ConnectorConfig, Result};
use reqwest::tls::Version;
use reqwest::Client as ReqwestClient;
use tracing::debug;

const USER_AGENT: &str = concat!("claimgate/", env!("CARGO_PKG_VERSION"));

use super::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::errors::InfraError;

/// Single-attempt HTTP transport backed by a pooled reqwest client.
///
/// TLS 1.2 is the minimum negotiated version. Retries are layered on top by
/// [`super::RetryingTransport`].
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Start building a new transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Transport honouring the connector's timeout and TLS settings.
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        Self::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .accept_invalid_certs(!config.verify_tls)
            .build()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest { method, url, headers, body } = request;
        debug!(%method, %url, "sending HTTP request");

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|err| {
            debug!(%method, %url, error = %err, "HTTP request failed");
            ClaimGateError::from(InfraError::from(err))
        })?;

        let status = response.status();
        debug!(%method, %url, %status, "received HTTP response");

        let body =
            response.text().await.map_err(|err| ClaimGateError::from(InfraError::from(err)))?;
        Ok(HttpResponse { status, body })
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    accept_invalid_certs: bool,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            accept_invalid_certs: false,
        }
    }
}

impl ReqwestTransportBuilder {
    /// Bound on each attempt: connect, send and response body combined.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Skip certificate verification; sandbox use only.
    pub fn accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.accept_invalid_certs = enabled;
        self
    }

    pub fn build(self) -> Result<ReqwestTransport> {
        let mut builder = ReqwestClient::builder()
            .timeout(self.timeout)
            .min_tls_version(Version::TLS_1_2)
            .no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if self.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            ClaimGateError::from(infra)
        })?;

        Ok(ReqwestTransport { client, timeout: self.timeout })
    }
}
