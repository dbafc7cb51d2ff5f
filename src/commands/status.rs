use super::types::{PortStatus, StatusReport};
use super::InfraManager;
use crate::container::name_filter;
use crate::error::Result;
use tracing::warn;

impl InfraManager {
    /// Read-only view of containers and ports; safe to run at any time
    pub async fn status(&self) -> Result<StatusReport> {
        self.console.header("📊 Infrastructure Status");

        let query = self.container_table_query();
        let containers = match self.runner.run(&query).await {
            Ok(output) if output.success() => {
                self.console.section("\n🐳 Docker Containers:");
                self.console.plain(output.stdout.trim_end());
                Some(output.stdout)
            }
            Ok(output) => {
                warn!("Container listing failed: {}", output.diagnostic());
                self.console.failure("❌ Failed to get container status");
                None
            }
            Err(e) => {
                warn!("Container listing failed: {}", e);
                self.console.failure("❌ Failed to get container status");
                None
            }
        };

        self.console.section("\n🌐 Port Status:");
        let mut ports = Vec::with_capacity(self.config.ports.len());
        for port in &self.config.ports {
            let in_use = self.ports.is_port_in_use(port.port).await;
            if in_use {
                self.console
                    .success(format!("✅ {}: {}", port.name, port.url));
            } else {
                self.console
                    .failure(format!("❌ {}: Not running", port.name));
            }
            ports.push(PortStatus {
                port: port.clone(),
                in_use,
            });
        }

        Ok(StatusReport { containers, ports })
    }

    fn container_table_query(&self) -> String {
        let mut query =
            String::from("docker ps --format \"table {{.Names}}\\t{{.Status}}\\t{{.Ports}}\"");
        for dependency in &self.config.dependencies {
            query.push(' ');
            query.push_str(&name_filter(&dependency.name));
        }
        query
    }
}
