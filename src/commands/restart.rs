use super::types::StartSummary;
use super::InfraManager;
use crate::error::Result;
use tracing::debug;

impl InfraManager {
    /// Stop, wait for sockets to be released, start again
    pub async fn restart(&self) -> Result<StartSummary> {
        self.stop().await?;

        let pause = self.config.restart_pause();
        debug!("Pausing {:?} before starting again", pause);
        tokio::time::sleep(pause).await;

        self.start().await
    }
}
