use super::*;
use crate::exec::{MockCommandRunner, MockResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Answers on the `succeed_on`-th call, never when `None`
struct CountingCheck {
    succeed_on: Option<u32>,
    calls: Mutex<u32>,
}

impl CountingCheck {
    fn new(succeed_on: Option<u32>) -> Arc<Self> {
        Arc::new(Self {
            succeed_on,
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> u32 {
        *self.calls.lock()
    }
}

#[async_trait]
impl ReachabilityCheck for CountingCheck {
    async fn is_reachable(&self, _url: &str) -> bool {
        let mut calls = self.calls.lock();
        *calls += 1;
        self.succeed_on.is_some_and(|k| *calls >= k)
    }
}

fn target(attempts: u32, interval_ms: u64) -> HealthTarget {
    HealthTarget::new("Prometheus", "http://localhost:9090/api/v1/targets")
        .with_attempts(attempts, Duration::from_millis(interval_ms))
}

#[tokio::test(start_paused = true)]
async fn test_health_wait_times_out_after_exact_attempts() {
    for (attempts, interval_ms) in [(1, 2000), (3, 500), (15, 2000)] {
        let check = CountingCheck::new(None);
        let waiter = HealthWaiter::new(check.clone());

        let started = Instant::now();
        let outcome = waiter.wait_until_ready(&target(attempts, interval_ms)).await;

        assert_eq!(outcome, HealthOutcome::TimedOut { attempts });
        assert_eq!(check.calls(), attempts);
        assert!(
            started.elapsed() >= Duration::from_millis(interval_ms * (attempts as u64 - 1))
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_health_wait_stops_at_first_success() {
    let check = CountingCheck::new(Some(4));
    let waiter = HealthWaiter::new(check.clone());

    let started = Instant::now();
    let outcome = waiter.wait_until_ready(&target(15, 2000)).await;

    assert_eq!(outcome, HealthOutcome::Ready { attempts: 4 });
    assert_eq!(check.calls(), 4);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(6));
    assert!(elapsed < Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn test_health_wait_immediate_success_does_not_sleep() {
    let check = CountingCheck::new(Some(1));
    let waiter = HealthWaiter::new(check.clone());

    let started = Instant::now();
    let outcome = waiter.wait_until_ready(&target(15, 2000)).await;

    assert!(outcome.is_ready());
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[test]
fn test_health_target_from_dependency() {
    let config = crate::config::InfraConfig::default();
    let target = HealthTarget::for_dependency(&config.dependencies[0], &config.health).unwrap();

    assert_eq!(target.name, "Prometheus");
    assert_eq!(target.url, "http://localhost:9090/api/v1/targets");
    assert_eq!(target.max_attempts, 15);
    assert_eq!(target.interval, Duration::from_secs(2));

    let mut dependency = config.dependencies[0].clone();
    dependency.health_url = None;
    assert!(HealthTarget::for_dependency(&dependency, &config.health).is_none());
}

#[tokio::test]
async fn test_http_reachability_refused_connection() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let check = HttpReachability::new(Duration::from_millis(500));
    assert!(!check.is_reachable(&format!("http://127.0.0.1:{}/", port)).await);
}

#[tokio::test]
async fn test_port_probe_reports_bound_port() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("lsof -i :9090", MockResponse::ok("prometheus 123 ..."));
    mock.on("lsof -i :3013", MockResponse::fail(1, ""));

    let probe = PortProbe::new(mock.clone());

    assert!(probe.is_port_in_use(9090).await);
    assert!(!probe.is_port_in_use(3013).await);
}

#[tokio::test]
async fn test_port_probe_query_failure_reads_as_free() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("lsof", MockResponse::SpawnError("lsof: not found".to_string()));

    let probe = PortProbe::new(mock);
    assert!(!probe.is_port_in_use(3012).await);
}
