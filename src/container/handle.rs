use super::types::{StartOutcome, StopOutcome};
use crate::error::Result;
use crate::exec::CommandRunner;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Idempotent control over named containers in the process engine.
///
/// The engine is the only source of truth; nothing about previous calls is
/// remembered here.
#[derive(Clone)]
pub struct ContainerHandle {
    runner: Arc<dyn CommandRunner>,
}

/// Engine name filter matching exactly `name`.
///
/// The engine treats `name=` as a substring match, so `prometheus` alone
/// would also match `prometheus-exporter`.
pub(crate) fn name_filter(name: &str) -> String {
    format!("--filter \"name=^{}$\"", name)
}

impl ContainerHandle {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Query errors read as "not running"
    pub async fn is_running(&self, name: &str) -> bool {
        let query = format!("docker ps -q {}", name_filter(name));
        match self.runner.run(&query).await {
            Ok(output) if output.success() => !output.stdout.trim().is_empty(),
            Ok(output) => {
                debug!("Running-state query for {} failed: {}", name, output.diagnostic());
                false
            }
            Err(e) => {
                debug!("Running-state query for {} failed: {}", name, e);
                false
            }
        }
    }

    /// Run `start_command` unless the container is already up.
    ///
    /// A start command that exits non-zero yields `Failed`; `Err` means the
    /// command could not be launched at all.
    pub async fn start(&self, name: &str, start_command: &str) -> Result<StartOutcome> {
        if self.is_running(name).await {
            warn!("{} is already running", name);
            return Ok(StartOutcome::AlreadyRunning);
        }

        let output = self.runner.run(start_command).await?;
        if output.success() {
            info!("{} started", name);
            Ok(StartOutcome::Started)
        } else {
            let diagnostic = output.diagnostic();
            error!("Failed to start {}: {}", name, diagnostic);
            Ok(StartOutcome::Failed(diagnostic))
        }
    }

    /// Stop then remove the container. Both halves always run.
    pub async fn stop(&self, name: &str) -> StopOutcome {
        if !self.is_running(name).await {
            warn!("{} is not running", name);
            return StopOutcome::AlreadyStopped;
        }

        let mut failures = Vec::new();
        for step in ["stop", "rm"] {
            let command = format!("docker {} {}", step, name);
            match self.runner.run(&command).await {
                Ok(output) if output.success() => debug!("`{}` succeeded", command),
                Ok(output) => failures.push(format!("{}: {}", step, output.diagnostic())),
                Err(e) => failures.push(format!("{}: {}", step, e)),
            }
        }

        if failures.is_empty() {
            info!("{} stopped", name);
            StopOutcome::Stopped
        } else {
            let message = failures.join("; ");
            error!("Failed to stop {}: {}", name, message);
            StopOutcome::Failed(message)
        }
    }
}
