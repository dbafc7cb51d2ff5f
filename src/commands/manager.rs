use super::console::Console;
use crate::config::InfraConfig;
use crate::container::ContainerHandle;
use crate::exec::{CommandRunner, ShellRunner};
use crate::probe::{HealthWaiter, HttpReachability, PortProbe, ReachabilityCheck};
use std::sync::Arc;
use std::time::Duration;

/// User-facing verbs over the declared dependencies.
///
/// Every verb is re-entrant: it asks the process engine for the current state
/// instead of remembering earlier invocations.
pub struct InfraManager {
    pub(super) config: InfraConfig,
    pub(super) runner: Arc<dyn CommandRunner>,
    pub(super) containers: ContainerHandle,
    pub(super) ports: PortProbe,
    pub(super) health: HealthWaiter,
    pub(super) console: Console,
}

impl InfraManager {
    pub fn new(
        config: InfraConfig,
        runner: Arc<dyn CommandRunner>,
        reachability: Arc<dyn ReachabilityCheck>,
        console: Console,
    ) -> Self {
        Self {
            containers: ContainerHandle::new(Arc::clone(&runner)),
            ports: PortProbe::new(Arc::clone(&runner)),
            health: HealthWaiter::new(reachability),
            runner,
            config,
            console,
        }
    }

    /// Wire the manager to the local shell, HTTP probes and stdout
    pub fn from_config(config: InfraConfig) -> Self {
        let request_timeout = Duration::from_millis(config.health.request_timeout_ms);
        Self::new(
            config,
            Arc::new(ShellRunner::new()),
            Arc::new(HttpReachability::new(request_timeout)),
            Console::stdout(),
        )
    }

    pub fn config(&self) -> &InfraConfig {
        &self.config
    }

    pub fn console(&self) -> &Console {
        &self.console
    }
}
