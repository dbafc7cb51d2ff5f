/// Result of asking for a container to be running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    Failed(String),
}

/// Result of asking for a container to be gone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
    Failed(String),
}

impl StartOutcome {
    /// Started and already-running both leave the container in the desired state
    pub fn is_success(&self) -> bool {
        !matches!(self, StartOutcome::Failed(_))
    }
}

impl StopOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, StopOutcome::Failed(_))
    }
}
