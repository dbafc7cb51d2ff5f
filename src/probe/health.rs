use crate::config::{DependencyConfig, HealthConfig};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Bare reachability check against a URL
#[async_trait]
pub trait ReachabilityCheck: Send + Sync {
    /// True when the endpoint answered at all; status and body are ignored
    async fn is_reachable(&self, url: &str) -> bool;
}

/// Reachability over HTTP GET
#[derive(Clone)]
pub struct HttpReachability {
    client: reqwest::Client,
}

impl HttpReachability {
    pub fn new(request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self { client }
    }
}

#[async_trait]
impl ReachabilityCheck for HttpReachability {
    async fn is_reachable(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => {
                debug!("{} answered with {}", url, response.status());
                true
            }
            Err(e) => {
                debug!("{} not reachable: {}", url, e);
                false
            }
        }
    }
}

/// Readiness probe description
#[derive(Debug, Clone, PartialEq)]
pub struct HealthTarget {
    pub name: String,
    pub url: String,
    pub max_attempts: u32,
    pub interval: Duration,
}

impl HealthTarget {
    pub fn new<S: Into<String>>(name: S, url: S) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            max_attempts: 15,
            interval: Duration::from_millis(2000),
        }
    }

    /// Build the probe for a dependency, if it declares a health URL
    pub fn for_dependency(dependency: &DependencyConfig, health: &HealthConfig) -> Option<Self> {
        dependency.health_url.as_ref().map(|url| Self {
            name: dependency.display_name.clone(),
            url: url.clone(),
            max_attempts: health.max_attempts,
            interval: health.interval(),
        })
    }

    pub fn with_attempts(mut self, max_attempts: u32, interval: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.interval = interval;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl HealthOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, HealthOutcome::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            HealthOutcome::Ready { attempts } | HealthOutcome::TimedOut { attempts } => *attempts,
        }
    }
}

/// Polls a target at a fixed interval until it answers or the attempt budget runs out
#[derive(Clone)]
pub struct HealthWaiter {
    check: Arc<dyn ReachabilityCheck>,
}

impl HealthWaiter {
    pub fn new(check: Arc<dyn ReachabilityCheck>) -> Self {
        Self { check }
    }

    pub async fn wait_until_ready(&self, target: &HealthTarget) -> HealthOutcome {
        info!("Waiting for {} at {}", target.name, target.url);

        for attempt in 1..=target.max_attempts {
            if self.check.is_reachable(&target.url).await {
                info!("{} ready after {} attempt(s)", target.name, attempt);
                return HealthOutcome::Ready { attempts: attempt };
            }

            debug!(
                "{} not ready (attempt {}/{})",
                target.name, attempt, target.max_attempts
            );
            tokio::time::sleep(target.interval).await;
        }

        warn!(
            "{} not ready after {} attempts",
            target.name, target.max_attempts
        );
        HealthOutcome::TimedOut {
            attempts: target.max_attempts,
        }
    }
}
