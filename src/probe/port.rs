use crate::exec::CommandRunner;
use std::sync::Arc;
use tracing::debug;

/// Reports whether some process holds a TCP port. Diagnostics only.
#[derive(Clone)]
pub struct PortProbe {
    runner: Arc<dyn CommandRunner>,
}

impl PortProbe {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Any query failure, including a missing `lsof`, reads as "free"
    pub async fn is_port_in_use(&self, port: u16) -> bool {
        match self.runner.run(&format!("lsof -i :{}", port)).await {
            Ok(output) => output.success(),
            Err(e) => {
                debug!("Port query for {} failed, assuming free: {}", port, e);
                false
            }
        }
    }
}
