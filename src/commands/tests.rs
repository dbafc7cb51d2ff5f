use super::*;
use crate::config::{DependencyConfig, InfraConfig};
use crate::container::{StartOutcome, StopOutcome};
use crate::error::InfraError;
use crate::exec::{MockCommandRunner, MockResponse};
use crate::probe::{HealthOutcome, ReachabilityCheck};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Answers only for the configured URLs and records every probe
#[derive(Default)]
struct FakeReachability {
    reachable: HashSet<String>,
    probed: Mutex<Vec<String>>,
}

impl FakeReachability {
    fn reaching(urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            reachable: urls.iter().map(|u| u.to_string()).collect(),
            probed: Mutex::new(Vec::new()),
        })
    }

    fn probed_urls(&self) -> HashSet<String> {
        self.probed.lock().iter().cloned().collect()
    }
}

#[async_trait]
impl ReachabilityCheck for FakeReachability {
    async fn is_reachable(&self, url: &str) -> bool {
        self.probed.lock().push(url.to_string());
        self.reachable.contains(url)
    }
}

fn dependency(name: &str) -> DependencyConfig {
    DependencyConfig {
        name: name.to_string(),
        display_name: name.to_uppercase(),
        start_command: format!("docker run -d --name {} image/{}", name, name),
        health_url: Some(format!("http://localhost/{}", name)),
    }
}

fn create_test_config(names: &[&str]) -> InfraConfig {
    let mut config = InfraConfig::default();
    config.dependencies = names.iter().map(|n| dependency(n)).collect();
    config.health.max_attempts = 2;
    config.health.interval_ms = 100;
    config
}

fn create_manager(
    config: InfraConfig,
    mock: &Arc<MockCommandRunner>,
    reachability: &Arc<FakeReachability>,
) -> InfraManager {
    InfraManager::new(
        config,
        mock.clone(),
        reachability.clone(),
        Console::buffered(),
    )
}

const MUTATING: [&str; 4] = ["docker run", "docker stop", "docker rm", "pkill"];

#[tokio::test(start_paused = true)]
async fn test_start_attempts_every_dependency_after_a_failure() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("--name beta", MockResponse::fail(125, "image not found"));
    let reachability = FakeReachability::reaching(&[
        "http://localhost/alpha",
        "http://localhost/gamma",
    ]);
    let manager = create_manager(
        create_test_config(&["alpha", "beta", "gamma"]),
        &mock,
        &reachability,
    );

    let summary = manager.start().await.unwrap();

    for name in ["alpha", "beta", "gamma"] {
        assert_eq!(mock.count_matching(&format!("--name {}", name)), 1);
    }
    assert_eq!(
        reachability.probed_urls(),
        ["alpha", "beta", "gamma"]
            .iter()
            .map(|n| format!("http://localhost/{}", n))
            .collect::<HashSet<_>>()
    );

    let alpha = summary.get("alpha").unwrap();
    assert_eq!(alpha.start, StartOutcome::Started);
    assert_eq!(alpha.health, Some(HealthOutcome::Ready { attempts: 1 }));
    assert!(alpha.is_healthy());

    let beta = summary.get("beta").unwrap();
    assert_eq!(beta.start, StartOutcome::Failed("image not found".to_string()));
    assert_eq!(beta.health, Some(HealthOutcome::TimedOut { attempts: 2 }));
    assert!(!beta.is_healthy());

    let gamma = summary.get("gamma").unwrap();
    assert_eq!(gamma.start, StartOutcome::Started);
    assert!(gamma.is_healthy());

    assert!(!summary.is_fully_ready());
    assert!(manager
        .console()
        .contains(Tone::Failure, "BETA: failed to start (image not found)"));
    assert!(manager.console().contains(Tone::Success, "ALPHA: started, ready"));
    assert!(manager.console().contains(Tone::Success, "GAMMA: started, ready"));
}

#[tokio::test]
async fn test_start_aborts_when_engine_unreachable() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("docker info", MockResponse::fail(1, "Cannot connect to the Docker daemon"));
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    let result = manager.start().await;

    assert!(matches!(result, Err(InfraError::EngineUnavailable { .. })));
    assert_eq!(mock.commands(), vec!["docker info"]);
    assert!(reachability.probed_urls().is_empty());
}

#[tokio::test]
async fn test_start_with_running_containers_issues_no_starts() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("docker ps -q", MockResponse::ok("c0ffee\n"));
    let reachability = FakeReachability::reaching(&["http://localhost/alpha"]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    let summary = manager.start().await.unwrap();

    assert_eq!(summary.get("alpha").unwrap().start, StartOutcome::AlreadyRunning);
    assert!(summary.is_fully_ready());
    assert_eq!(mock.count_matching("docker run"), 0);
    assert!(manager
        .console()
        .contains(Tone::Warning, "alpha is already running"));
}

#[tokio::test]
async fn test_start_reports_ports_without_gating() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("lsof -i :9090", MockResponse::ok("prometheus"));
    mock.on("lsof", MockResponse::fail(1, ""));
    let reachability = FakeReachability::reaching(&["http://localhost/alpha"]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    let summary = manager.start().await.unwrap();

    assert!(summary.is_fully_ready());
    assert!(manager
        .console()
        .contains(Tone::Warning, "Port 9090 (Prometheus) is in use"));
    assert!(manager
        .console()
        .contains(Tone::Success, "Port 3012 (Server) is available"));
}

#[tokio::test]
async fn test_stop_when_nothing_runs() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("pkill", MockResponse::fail(1, ""));
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha", "beta"]), &mock, &reachability);

    let summary = manager.stop().await.unwrap();

    assert_eq!(summary.get("alpha"), Some(&StopOutcome::AlreadyStopped));
    assert_eq!(summary.get("beta"), Some(&StopOutcome::AlreadyStopped));
    assert!(summary.is_clean());
    assert!(!summary.dev_processes_stopped);
    assert_eq!(mock.count_matching("docker stop"), 0);
    assert_eq!(mock.count_matching("docker rm"), 0);
    assert!(manager
        .console()
        .contains(Tone::Warning, "No development processes running"));
}

#[tokio::test]
async fn test_stop_kills_dev_processes_by_pattern() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("docker ps -q", MockResponse::ok("c0ffee"));
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    let summary = manager.stop().await.unwrap();

    assert_eq!(summary.get("alpha"), Some(&StopOutcome::Stopped));
    assert!(summary.dev_processes_stopped);
    assert_eq!(mock.count_matching("pkill -f \"turbo.*dev\""), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_is_stop_pause_start() {
    let mock = Arc::new(MockCommandRunner::new());
    let reachability = FakeReachability::reaching(&["http://localhost/alpha"]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    let summary = manager.restart().await.unwrap();
    assert!(summary.is_fully_ready());

    let calls = mock.calls();
    let engine_check = calls
        .iter()
        .position(|c| c.command == "docker info")
        .unwrap();
    let pkill = calls
        .iter()
        .position(|c| c.command.starts_with("pkill"))
        .unwrap();

    // Stop half is entirely before the start half
    assert!(pkill < engine_check);
    assert!(calls[..engine_check]
        .iter()
        .all(|c| !c.command.contains("docker run") && c.command != "docker info"));
    assert!(calls[engine_check..]
        .iter()
        .all(|c| !c.command.starts_with("pkill")));

    let pause = calls[engine_check].at - calls[engine_check - 1].at;
    assert!(pause >= Duration::from_secs(2));
}

#[tokio::test]
async fn test_status_never_mutates() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on(
        "docker ps --format",
        MockResponse::ok("NAMES     STATUS    PORTS\nalpha     Up 2 min  0.0.0.0:9090->9090/tcp\n"),
    );
    mock.on("lsof -i :3012", MockResponse::ok("node"));
    mock.on("lsof", MockResponse::fail(1, ""));
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha", "beta"]), &mock, &reachability);

    for _ in 0..3 {
        let report = manager.status().await.unwrap();
        assert!(report.containers.as_deref().unwrap().contains("alpha"));
        assert_eq!(report.ports.len(), 4);
        assert!(report.ports.iter().any(|p| p.port.port == 3012 && p.in_use));
        assert!(report.ports.iter().any(|p| p.port.port == 9090 && !p.in_use));
    }

    for pattern in MUTATING {
        assert_eq!(mock.count_matching(pattern), 0, "status issued {}", pattern);
    }
    assert!(mock
        .commands()
        .iter()
        .any(|c| c.contains("--filter \"name=^alpha$\" --filter \"name=^beta$\"")));
    assert!(manager.console().contains(Tone::Success, "Server: http://localhost:3012"));
    assert!(manager.console().contains(Tone::Failure, "Grafana: Not running"));
}

#[tokio::test]
async fn test_status_survives_listing_failure() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("docker ps --format", MockResponse::fail(1, "daemon down"));
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    let report = manager.status().await.unwrap();

    assert!(report.containers.is_none());
    assert_eq!(report.ports.len(), 4);
    assert!(manager
        .console()
        .contains(Tone::Failure, "Failed to get container status"));
}

#[tokio::test]
async fn test_dispatch_defaults_to_help() {
    let mock = Arc::new(MockCommandRunner::new());
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    assert_eq!(manager.dispatch(None).await, 0);
    assert!(manager.console().contains(Tone::Header, "Infrastructure Manager"));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_dispatch_unknown_command_exits_one() {
    let mock = Arc::new(MockCommandRunner::new());
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    assert_eq!(manager.dispatch(Some("deploy")).await, 1);
    assert!(manager
        .console()
        .contains(Tone::Failure, "Unknown command: deploy"));
    assert!(manager.console().contains(Tone::Plain, "restart"));
}

#[tokio::test]
async fn test_dispatch_engine_unreachable_exits_one() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("docker info", MockResponse::SpawnError("docker: not found".to_string()));
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    assert_eq!(manager.dispatch(Some("start")).await, 1);
    assert!(manager.console().contains(Tone::Failure, "Command failed"));
}

#[tokio::test]
async fn test_dispatch_start_aborts_when_start_command_cannot_launch() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("--name alpha", MockResponse::SpawnError("sh: fork failed".to_string()));
    let reachability = FakeReachability::reaching(&["http://localhost/beta"]);
    let manager = create_manager(create_test_config(&["alpha", "beta"]), &mock, &reachability);

    assert_eq!(manager.dispatch(Some("start")).await, 1);
    assert_eq!(mock.count_matching("--name alpha"), 1);
    assert_eq!(mock.count_matching("--name beta"), 0);
    assert!(reachability.probed_urls().is_empty());
    assert!(manager.console().contains(Tone::Failure, "Command failed"));
}

#[tokio::test]
async fn test_docker_command_follows_compose_exit_code() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on_sequence(
        "docker-compose -f docker-compose.dev.yml up -d --build",
        vec![MockResponse::ok(""), MockResponse::fail(1, "build failed")],
    );
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    assert_eq!(manager.dispatch(Some("docker")).await, 0);
    assert!(manager
        .console()
        .contains(Tone::Plain, "Grafana: http://localhost:3013"));

    assert!(matches!(
        manager.docker().await,
        Err(InfraError::Compose { message }) if message == "build failed"
    ));
}

#[tokio::test]
async fn test_test_command_propagates_script_failure() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("bash", MockResponse::fail(2, ""));
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(create_test_config(&["alpha"]), &mock, &reachability);

    let result = manager.test().await;

    assert!(matches!(result, Err(InfraError::Script { code: 2, .. })));
    assert_eq!(
        mock.commands(),
        vec!["bash ./scripts/infra/test-infrastructure.sh"]
    );
    assert_eq!(manager.dispatch(Some("test")).await, 1);
}

#[test]
fn test_command_parsing() {
    for command in Command::ALL {
        assert_eq!(command.name().parse::<Command>().unwrap(), command);
    }
    assert!(matches!(
        "Start".parse::<Command>(),
        Err(InfraError::UnknownCommand(name)) if name == "Start"
    ));
}

#[tokio::test]
async fn test_help_works_with_invalid_config() {
    let mut config = create_test_config(&["alpha"]);
    config.health.max_attempts = 0;
    assert!(config.validate().is_err());
    assert!(!Command::Help.needs_config());
    assert!(Command::ALL
        .iter()
        .filter(|c| **c != Command::Help)
        .all(|c| c.needs_config()));

    let mock = Arc::new(MockCommandRunner::new());
    let reachability = FakeReachability::reaching(&[]);
    let manager = create_manager(config, &mock, &reachability);

    assert_eq!(manager.dispatch(Some("help")).await, 0);
    assert!(manager.console().contains(Tone::Header, "Infrastructure Manager"));
}
