use super::types::ShutdownReason;
use super::ShutdownCoordinator;
use crate::error::Result;
use std::fmt;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

impl ShutdownCoordinator {
    /// Route SIGTERM and SIGINT into [`ShutdownCoordinator::trigger`].
    ///
    /// Handlers stay installed after the first signal so repeats are logged.
    pub fn install_signal_handlers(&self) -> Result<()> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            for (kind, name) in [
                (SignalKind::terminate(), "SIGTERM"),
                (SignalKind::interrupt(), "SIGINT"),
            ] {
                let mut stream = signal(kind)?;
                let coordinator = self.clone();
                tokio::spawn(async move {
                    while stream.recv().await.is_some() {
                        info!("Received {} signal", name);
                        coordinator.trigger(ShutdownReason::Signal(name.to_string()));
                    }
                });
            }
        }

        #[cfg(not(unix))]
        {
            let coordinator = self.clone();
            tokio::spawn(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received SIGINT signal (Ctrl+C)");
                    coordinator.trigger(ShutdownReason::Signal("SIGINT".to_string()));
                }
            });
        }

        Ok(())
    }

    /// Treat any panic as an uncaught fault; the previous hook still runs
    pub fn install_panic_hook(&self) {
        let coordinator = self.clone();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            error!("Uncaught fault: {}", panic_info);
            coordinator.trigger(ShutdownReason::Fault(panic_info.to_string()));
            previous(panic_info);
        }));
    }

    /// Log an unhandled async error and start draining.
    ///
    /// For embedders whose background work reports errors outside
    /// [`ShutdownCoordinator::spawn_supervised`]; `api-server` itself has none.
    pub fn report_fatal<E: fmt::Display>(&self, context: &str, error: E) -> bool {
        error!("Unhandled rejection in {}: {}", context, error);
        self.trigger(ShutdownReason::Rejection(format!("{}: {}", context, error)))
    }

    /// Spawn a background task whose failure or panic starts the drain.
    ///
    /// Entry point for embedders adding long-lived tasks next to the server.
    pub fn spawn_supervised<F, E>(&self, name: &str, task: F) -> JoinHandle<()>
    where
        F: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let coordinator = self.clone();
        let name = name.to_string();
        let handle = tokio::spawn(task);

        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => debug!("Task {} finished", name),
                Ok(Err(e)) => {
                    coordinator.report_fatal(&name, e);
                }
                Err(join_error) if join_error.is_panic() => {
                    error!("Task {} panicked", name);
                    coordinator.trigger(ShutdownReason::Fault(format!("task {} panicked", name)));
                }
                Err(_) => debug!("Task {} was cancelled", name),
            }
        })
    }
}
