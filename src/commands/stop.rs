use super::types::StopSummary;
use super::InfraManager;
use crate::container::StopOutcome;
use crate::error::Result;
use tracing::info;

impl InfraManager {
    /// Stop every dependency, then best-effort kill local dev processes
    pub async fn stop(&self) -> Result<StopSummary> {
        self.console.header("🛑 Stopping Infrastructure...");

        self.console.section("\n🐳 Stopping containers...");
        let mut dependencies = Vec::with_capacity(self.config.dependencies.len());
        for dependency in &self.config.dependencies {
            let outcome = self.containers.stop(&dependency.name).await;

            match &outcome {
                StopOutcome::Stopped => self
                    .console
                    .success(format!("✅ {} stopped successfully", dependency.name)),
                StopOutcome::AlreadyStopped => self
                    .console
                    .warning(format!("⚠️  {} is not running", dependency.name)),
                StopOutcome::Failed(reason) => self
                    .console
                    .failure(format!("❌ Failed to stop {}: {}", dependency.name, reason)),
            }

            dependencies.push((dependency.name.clone(), outcome));
        }

        self.console.section("\n🔄 Stopping development processes...");
        let dev_processes_stopped = self.stop_dev_processes().await;

        let summary = StopSummary {
            dependencies,
            dev_processes_stopped,
        };

        if summary.is_clean() {
            self.console
                .success("\n✅ Infrastructure stopped successfully!");
        } else {
            self.console
                .warning("\n⚠️  Infrastructure stopped with issues, see above");
        }

        info!("Stop finished (clean: {})", summary.is_clean());
        Ok(summary)
    }

    /// Failing to find or kill anything reads as "none running"
    async fn stop_dev_processes(&self) -> bool {
        let command = format!("pkill -f \"{}\"", self.config.dev_process_pattern);
        match self.runner.run(&command).await {
            Ok(output) if output.success() => {
                self.console.success("✅ Development processes stopped");
                true
            }
            _ => {
                self.console.warning("⚠️  No development processes running");
                false
            }
        }
    }
}
