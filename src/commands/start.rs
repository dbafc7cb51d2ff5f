use super::types::{DependencyReport, StartSummary};
use super::InfraManager;
use crate::container::StartOutcome;
use crate::error::{InfraError, Result};
use crate::probe::HealthTarget;
use tracing::{error, info, warn};

impl InfraManager {
    /// Bring every declared dependency up, then wait for each to answer.
    ///
    /// One dependency failing never stops the others from being attempted.
    /// Only an unreachable process engine aborts the whole command.
    pub async fn start(&self) -> Result<StartSummary> {
        self.console.header("🚀 Starting Infrastructure...");

        self.ensure_engine().await?;
        self.report_port_availability().await;

        self.console.section("\n🐳 Starting containers...");
        let mut reports = Vec::with_capacity(self.config.dependencies.len());
        for dependency in &self.config.dependencies {
            let outcome = self
                .containers
                .start(&dependency.name, &dependency.start_command)
                .await?;

            match &outcome {
                StartOutcome::Started => self
                    .console
                    .success(format!("✅ {} started successfully", dependency.name)),
                StartOutcome::AlreadyRunning => self
                    .console
                    .warning(format!("⚠️  {} is already running", dependency.name)),
                StartOutcome::Failed(reason) => self
                    .console
                    .failure(format!("❌ Failed to start {}: {}", dependency.name, reason)),
            }

            reports.push(DependencyReport::new(dependency, outcome));
        }

        self.console.section("\n⏳ Waiting for services...");
        for (dependency, report) in self.config.dependencies.iter().zip(reports.iter_mut()) {
            let Some(target) = HealthTarget::for_dependency(dependency, &self.config.health) else {
                continue;
            };

            self.console
                .warning(format!("⏳ Waiting for {} to be ready...", target.name));
            let outcome = self.health.wait_until_ready(&target).await;
            if outcome.is_ready() {
                self.console.success(format!("✅ {} is ready!", target.name));
            } else {
                self.console
                    .failure(format!("❌ {} failed to start within timeout", target.name));
            }
            report.health = Some(outcome);
        }

        let summary = StartSummary {
            dependencies: reports,
        };
        self.print_start_summary(&summary);

        if summary.is_fully_ready() {
            info!("All {} dependencies are up", summary.dependencies.len());
        } else {
            warn!("Infrastructure started in a degraded state");
        }

        Ok(summary)
    }

    /// Nothing downstream can succeed without the engine
    pub(super) async fn ensure_engine(&self) -> Result<()> {
        let check = &self.config.engine.check_command;
        let details = match self.runner.run(check).await {
            Ok(output) if output.success() => return Ok(()),
            Ok(output) => output.diagnostic(),
            Err(e) => e.to_string(),
        };

        error!("Engine check `{}` failed: {}", check, details);
        Err(InfraError::EngineUnavailable { details })
    }

    async fn report_port_availability(&self) {
        self.console.section("\n🔍 Checking port availability...");
        for port in &self.config.ports {
            if self.ports.is_port_in_use(port.port).await {
                self.console
                    .warning(format!("⚠️  Port {} ({}) is in use", port.port, port.name));
            } else {
                self.console
                    .success(format!("✅ Port {} ({}) is available", port.port, port.name));
            }
        }
    }

    fn print_start_summary(&self, summary: &StartSummary) {
        self.console.section("\n📋 Summary:");
        for report in &summary.dependencies {
            let line = format!("{}: {}", report.display_name, report.describe());
            if !report.start.is_success() {
                self.console.failure(format!("❌ {}", line));
            } else if report.is_healthy() {
                self.console.success(format!("✅ {}", line));
            } else {
                self.console.warning(format!("⚠️  {}", line));
            }
        }

        if summary.is_fully_ready() {
            self.console
                .success("\n✅ Infrastructure started successfully!");
        } else {
            self.console
                .warning("\n⚠️  Infrastructure started with issues, see summary above");
        }

        self.console.section("\nNext steps:");
        self.console.plain("  • Check status: infra-manager status");
        self.console.plain("  • Test everything: infra-manager test");
        for dependency in &self.config.dependencies {
            if let Some(port) = self
                .config
                .ports
                .iter()
                .find(|p| p.name == dependency.display_name)
            {
                self.console
                    .plain(format!("  • Access {}: {}", port.name, port.url));
            }
        }
    }
}
