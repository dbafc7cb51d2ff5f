use super::types::Command;
use super::InfraManager;
use crate::error::Result;
use tracing::{error, info};

impl InfraManager {
    pub async fn execute(&self, command: Command) -> Result<()> {
        info!("Executing {} command", command);
        match command {
            Command::Start => self.start().await.map(|_| ()),
            Command::Stop => self.stop().await.map(|_| ()),
            Command::Restart => self.restart().await.map(|_| ()),
            Command::Status => self.status().await.map(|_| ()),
            Command::Test => self.test().await,
            Command::Docker => self.docker().await,
            Command::Help => {
                self.help();
                Ok(())
            }
        }
    }

    /// Run one CLI invocation and return the process exit code.
    ///
    /// A missing command means `help`. Unknown commands and every command
    /// error end up as exit code 1.
    pub async fn dispatch(&self, command: Option<&str>) -> i32 {
        let name = command.unwrap_or("help");

        let command = match name.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                self.console.failure(format!("❌ {}", e));
                self.help();
                return 1;
            }
        };

        match self.execute(command).await {
            Ok(()) => 0,
            Err(e) => {
                error!("{} command failed: {}", command, e);
                self.console.failure(format!("❌ Command failed: {}", e));
                1
            }
        }
    }
}
