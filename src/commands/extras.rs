use super::types::Command;
use super::InfraManager;
use crate::error::{InfraError, Result};
use tracing::info;

impl InfraManager {
    /// Run the infrastructure test script attached to the terminal
    pub async fn test(&self) -> Result<()> {
        self.console.header("🧪 Running infrastructure tests...");

        let script = self.config.test_script.clone();
        let code = self
            .runner
            .run_attached("bash", std::slice::from_ref(&script))
            .await?;

        match code {
            Some(0) => {
                self.console.success("✅ Infrastructure tests passed");
                Ok(())
            }
            code => Err(InfraError::Script {
                script,
                code: code.unwrap_or(-1),
            }),
        }
    }

    /// Hand the whole stack to compose; its exit code is the only verdict
    pub async fn docker(&self) -> Result<()> {
        self.console
            .header("🐳 Starting Full Docker Development Stack...");

        let file = &self.config.compose.file;
        let command = format!("docker-compose -f {} up -d --build", file);
        let output = self
            .runner
            .run(&command)
            .await
            .map_err(|e| InfraError::Compose {
                message: e.to_string(),
            })?;

        if !output.success() {
            return Err(InfraError::Compose {
                message: output.diagnostic(),
            });
        }

        info!("Compose stack from {} is up", file);
        self.console
            .success("\n✅ Docker stack started successfully!");
        self.console.section("\nServices available:");
        for service in &self.config.compose.services {
            self.console
                .plain(format!("  • {}: {}", service.name, service.url));
        }
        self.console.section("\nNext steps:");
        self.console.plain("  • Check status: infra-manager status");
        self.console
            .plain(format!("  • View logs: docker-compose -f {} logs -f", file));
        self.console
            .plain(format!("  • Stop stack: docker-compose -f {} down", file));

        Ok(())
    }

    pub fn help(&self) {
        self.console.header("🔧 Infrastructure Manager");
        self.console
            .section("\nUsage: infra-manager [OPTIONS] <command>");
        self.console.plain("\nCommands:");
        for command in Command::ALL {
            self.console
                .plain(format!("  {:<8} - {}", command.name(), command.description()));
        }
        self.console.plain("\nDevelopment Modes:");
        self.console
            .plain("  🔧 Hybrid (Recommended): infra-manager start, then run apps locally");
        self.console.plain("  🐳 Full Docker: infra-manager docker");
    }
}
