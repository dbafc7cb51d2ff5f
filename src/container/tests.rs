use super::*;
use crate::error::InfraError;
use crate::exec::{MockCommandRunner, MockResponse};
use std::sync::Arc;

const RUNNING_QUERY: &str = "docker ps -q --filter \"name=^prometheus$\"";
const START_COMMAND: &str = "docker run -d --name prometheus prom/prometheus:latest";

fn handle_with(mock: &Arc<MockCommandRunner>) -> ContainerHandle {
    ContainerHandle::new(mock.clone())
}

#[tokio::test]
async fn test_start_when_already_running_is_noop() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on(RUNNING_QUERY, MockResponse::ok("f1e2d3\n"));
    let handle = handle_with(&mock);

    let outcome = handle.start("prometheus", START_COMMAND).await.unwrap();

    assert_eq!(outcome, StartOutcome::AlreadyRunning);
    assert!(outcome.is_success());
    assert_eq!(mock.count_matching("docker run"), 0);
}

#[tokio::test]
async fn test_start_twice_launches_once() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on_sequence(
        RUNNING_QUERY,
        vec![MockResponse::ok(""), MockResponse::ok("f1e2d3\n")],
    );
    let handle = handle_with(&mock);

    let first = handle.start("prometheus", START_COMMAND).await.unwrap();
    let second = handle.start("prometheus", START_COMMAND).await.unwrap();

    assert_eq!(first, StartOutcome::Started);
    assert_eq!(second, StartOutcome::AlreadyRunning);
    assert_eq!(mock.count_matching("docker run"), 1);
}

#[tokio::test]
async fn test_start_failure_captures_diagnostic() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on(
        "docker run",
        MockResponse::fail(125, "port is already allocated\n"),
    );
    let handle = handle_with(&mock);

    let outcome = handle.start("prometheus", START_COMMAND).await.unwrap();

    assert_eq!(
        outcome,
        StartOutcome::Failed("port is already allocated".to_string())
    );
}

#[tokio::test]
async fn test_start_unlaunchable_command_is_error() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on("docker run", MockResponse::SpawnError("sh missing".to_string()));
    let handle = handle_with(&mock);

    let result = handle.start("prometheus", START_COMMAND).await;
    assert!(matches!(result, Err(InfraError::Command { .. })));
}

#[tokio::test]
async fn test_running_query_matches_whole_name_only() {
    let mock = Arc::new(MockCommandRunner::new());
    // Only the unanchored filter would see the exporter sidecar
    mock.on("name=prometheus\"", MockResponse::ok("e4e5e6\n"));
    let handle = handle_with(&mock);

    let outcome = handle.start("prometheus", START_COMMAND).await.unwrap();

    assert_eq!(outcome, StartOutcome::Started);
    assert_eq!(mock.commands()[0], RUNNING_QUERY);
    assert_eq!(mock.count_matching(START_COMMAND), 1);
}

#[tokio::test]
async fn test_running_query_error_reads_as_not_running() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on(RUNNING_QUERY, MockResponse::fail(1, "Cannot connect to the Docker daemon"));
    let handle = handle_with(&mock);

    assert!(!handle.is_running("prometheus").await);
}

#[tokio::test]
async fn test_stop_when_not_running_is_noop() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on(RUNNING_QUERY, MockResponse::ok(""));
    let handle = handle_with(&mock);

    let outcome = handle.stop("prometheus").await;

    assert_eq!(outcome, StopOutcome::AlreadyStopped);
    assert_eq!(mock.count_matching("docker stop"), 0);
    assert_eq!(mock.count_matching("docker rm"), 0);
}

#[tokio::test]
async fn test_stop_runs_stop_then_remove() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on(RUNNING_QUERY, MockResponse::ok("f1e2d3"));
    let handle = handle_with(&mock);

    let outcome = handle.stop("prometheus").await;

    assert_eq!(outcome, StopOutcome::Stopped);
    assert_eq!(
        mock.commands(),
        vec![
            RUNNING_QUERY.to_string(),
            "docker stop prometheus".to_string(),
            "docker rm prometheus".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_stop_failure_still_attempts_remove() {
    let mock = Arc::new(MockCommandRunner::new());
    mock.on(RUNNING_QUERY, MockResponse::ok("f1e2d3"));
    mock.on("docker stop", MockResponse::fail(1, "timeout"));
    let handle = handle_with(&mock);

    let outcome = handle.stop("prometheus").await;

    assert_eq!(outcome, StopOutcome::Failed("stop: timeout".to_string()));
    assert!(!outcome.is_success());
    assert_eq!(mock.count_matching("docker rm prometheus"), 1);
}
