use super::types::{ShutdownReason, ShutdownState};
use crate::error::Result;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

struct Phase {
    state: ShutdownState,
    draining_since: Option<Instant>,
}

struct Inner {
    phase: Mutex<Phase>,
    drain: CancellationToken,
    deadline: Duration,
}

/// Owns the server process's shutdown state.
///
/// Build one at process start and hand clones to whatever installs signal
/// and fault hooks. The first trigger moves `Running -> Draining` and starts
/// the deadline clock; later triggers are only logged.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    inner: Arc<Inner>,
}

impl ShutdownCoordinator {
    pub fn new(deadline: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                phase: Mutex::new(Phase {
                    state: ShutdownState::Running,
                    draining_since: None,
                }),
                drain: CancellationToken::new(),
                deadline,
            }),
        }
    }

    pub fn state(&self) -> ShutdownState {
        self.inner.phase.lock().state
    }

    pub fn deadline(&self) -> Duration {
        self.inner.deadline
    }

    /// Request a drain. Returns true only for the call that started it.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        let mut phase = self.inner.phase.lock();
        if phase.state != ShutdownState::Running {
            warn!(
                "Shutdown already in progress ({:?}), ignoring {}",
                phase.state, reason
            );
            return false;
        }

        phase.state = ShutdownState::Draining;
        phase.draining_since = Some(Instant::now());
        drop(phase);

        info!("Received shutdown trigger ({}), draining connections", reason);
        self.inner.drain.cancel();
        true
    }

    /// Resolves once draining begins; hand it to the server's graceful shutdown
    pub fn drain_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let token = self.inner.drain.clone();
        async move { token.cancelled().await }
    }

    /// Drive `serve` to completion and return the process exit code.
    ///
    /// `serve` must stop accepting connections once [`Self::drain_signal`]
    /// fires and resolve when the last in-flight connection is done. If it has
    /// not resolved by the deadline, the state becomes `ForceExiting` and 1 is
    /// returned regardless of open connections.
    pub async fn run<F>(&self, serve: F) -> i32
    where
        F: Future<Output = Result<()>>,
    {
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                return match result {
                    Ok(()) => {
                        info!("Server stopped without a shutdown trigger");
                        0
                    }
                    Err(e) => {
                        error!("Server failed: {}", e);
                        self.trigger(ShutdownReason::Fault(e.to_string()));
                        1
                    }
                };
            }
            _ = self.inner.drain.cancelled() => {}
        }

        match tokio::time::timeout_at(self.force_exit_at(), &mut serve).await {
            Ok(Ok(())) => {
                info!("Server closed");
                0
            }
            Ok(Err(e)) => {
                error!("Server failed while draining: {}", e);
                1
            }
            Err(_) => {
                self.inner.phase.lock().state = ShutdownState::ForceExiting;
                error!("Could not close connections in time, forcefully shutting down");
                1
            }
        }
    }

    fn force_exit_at(&self) -> Instant {
        let since = self
            .inner
            .phase
            .lock()
            .draining_since
            .unwrap_or_else(Instant::now);
        since + self.inner.deadline
    }
}
