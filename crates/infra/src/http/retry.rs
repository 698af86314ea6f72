//! Bounded retry for transient clearinghouse failures
//!
//! Retries cover the statuses in `RETRYABLE_STATUS_CODES` plus requests that
//! never produced a response. Delay before retry `n` is `n * backoff_base`.

use std::time::Duration;

use async_trait::async_trait;
use claimgate_domain::constants::RETRYABLE_STATUS_CODES;
use claimgate_domain::{ClaimGateError, Result, RetryConfig};
use tracing::{debug, warn};

use super::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Transport decorator that replays transient failures within a fixed budget.
pub struct RetryingTransport<T> {
    inner: T,
    max_retries: usize,
    backoff_base: Duration,
}

impl<T: HttpTransport> RetryingTransport<T> {
    pub fn new(inner: T, config: &RetryConfig) -> Self {
        Self { inner, max_retries: config.max_retries, backoff_base: config.backoff_base() }
    }

    /// Total number of requests a single call may issue.
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let factor = u32::try_from(retry_number).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for RetryingTransport<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let attempts = self.max_attempts();

        for attempt in 1..=attempts {
            let is_last = attempt == attempts;

            match self.inner.send(request.clone()).await {
                Ok(response) if is_retryable_status(response.status.as_u16()) => {
                    if is_last {
                        warn!(
                            url = %request.url,
                            attempts,
                            status = %response.status,
                            "retry budget exhausted"
                        );
                        return Err(ClaimGateError::transport_exhausted(
                            attempts,
                            response.status.as_u16(),
                            response.body,
                        ));
                    }
                    debug!(
                        attempt,
                        url = %request.url,
                        status = %response.status,
                        "retrying transient status"
                    );
                }
                Ok(response) => return Ok(response),
                Err(err @ ClaimGateError::Transport { .. }) => {
                    if is_last {
                        warn!(url = %request.url, attempts, error = %err, "retry budget exhausted");
                        return Err(err);
                    }
                    debug!(attempt, url = %request.url, error = %err, "retrying failed request");
                }
                Err(err) => return Err(err),
            }

            self.sleep_with_backoff(attempt).await;
        }

        Err(ClaimGateError::Internal("retrying transport made no attempt".into()))
    }
}

fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUS_CODES.contains(&status)
}
