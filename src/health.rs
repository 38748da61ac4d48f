use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::endpoints::{Endpoint, Endpoints};
use crate::transport::{HttpRequest, Transport};

#[derive(Debug, Clone)]
struct HealthRecord {
    healthy: bool,
    last_failure: Option<String>,
    changed_at: Option<SystemTime>,
}

/// Last known backend reachability, shared by every client that holds a clone.
#[derive(Debug, Clone)]
pub struct HealthState {
    inner: Arc<RwLock<HealthRecord>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HealthRecord {
                healthy: true,
                last_failure: None,
                changed_at: None,
            })),
        }
    }

    pub fn unhealthy(reason: impl Into<String>) -> Self {
        let state = Self::new();
        state.mark_unhealthy(reason);
        state
    }

    pub fn is_healthy(&self) -> bool {
        self.inner.read().healthy
    }

    pub fn mark_healthy(&self) {
        let mut record = self.inner.write();
        if !record.healthy {
            let down_for = record
                .changed_at
                .and_then(|at| at.elapsed().ok())
                .unwrap_or_default();
            log::info!("API marked healthy again after {:?}", down_for);
            record.changed_at = Some(SystemTime::now());
        }
        record.healthy = true;
        record.last_failure = None;
    }

    pub fn mark_unhealthy(&self, reason: impl Into<String>) {
        let reason = reason.into();
        let mut record = self.inner.write();
        if record.healthy {
            log::warn!("API marked unhealthy: {}", reason);
            record.changed_at = Some(SystemTime::now());
        }
        record.healthy = false;
        record.last_failure = Some(reason);
    }

    pub fn last_failure(&self) -> Option<String> {
        self.inner.read().last_failure.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthProbe {
    Enabled { timeout: Duration },
    /// Reports healthy without touching the network.
    Disabled,
}

impl HealthProbe {
    pub fn enabled(timeout: Duration) -> Self {
        HealthProbe::Enabled { timeout }
    }

    /// True iff the health endpoint answers 2xx within the timeout. On timeout
    /// the pending request future is dropped, which aborts the connection.
    pub async fn check<T: Transport + ?Sized>(&self, transport: &T, endpoints: &Endpoints) -> bool {
        let timeout = match self {
            HealthProbe::Disabled => return true,
            HealthProbe::Enabled { timeout } => *timeout,
        };

        let request = HttpRequest::get(endpoints.url_for(Endpoint::Health))
            .header("Accept", "application/json");

        match tokio::time::timeout(timeout, transport.send(request)).await {
            Ok(Ok(response)) => {
                if !response.is_success() {
                    log::warn!("API health check returned {}", response.status);
                }
                response.is_success()
            }
            Ok(Err(e)) if e.is_timeout() => {
                log::warn!("API health check timed out in transport: {}", e);
                false
            }
            Ok(Err(e)) => {
                log::error!("API health check failed: {}", e);
                false
            }
            Err(_) => {
                log::warn!("API health check timed out after {:?}", timeout);
                false
            }
        }
    }
}
