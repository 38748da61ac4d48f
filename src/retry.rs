use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::client::ApiClient;
use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::models::{AnalysisResult, ChatRequest, ChatResponse, TranslationRequest, TranslationResponse};
use crate::transport::Transport;

const MIN_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&ApiSettings::default())
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            max_retries: settings.retry_attempts,
            base_delay: settings.retry_delay,
        }
    }

    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before retry number `attempt + 1`: doubles each time, ±10% jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.base_delay.as_millis() as u64;
        let base = base.saturating_mul(1u64 << attempt.min(16));
        let jitter_range = (base as f64 * 0.1) as u64;
        let jitter = if jitter_range == 0 {
            0
        } else {
            let mut rng = rand::rng();
            rng.random_range(0..=jitter_range * 2) as i64 - jitter_range as i64
        };
        Duration::from_millis((base as i64 + jitter).max(MIN_DELAY_MS as i64) as u64)
    }

    pub async fn run<F, Fut, T>(&self, label: &str, mut op: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() || attempt >= self.max_retries => return Err(e),
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    let status = e.status().map(|s| format!(" [HTTP {}]", s)).unwrap_or_default();
                    log::warn!(
                        "[{}] retry {}/{}: {}{} (waiting {}ms)",
                        label,
                        attempt + 1,
                        self.max_retries,
                        e,
                        status,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Wraps an [`ApiClient`] and retries transient failures.
pub struct RetryingClient<T> {
    inner: ApiClient<T>,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingClient<T> {
    pub fn new(inner: ApiClient<T>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &ApiClient<T> {
        &self.inner
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, ApiError> {
        self.policy.run("analyze", || self.inner.analyze(text)).await
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.policy.run("chat", || self.inner.chat(request)).await
    }

    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ApiError> {
        self.policy.run("translate", || self.inner.translate(request)).await
    }
}
