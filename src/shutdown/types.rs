use std::fmt;

/// Process-wide shutdown progress. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    Draining,
    ForceExiting,
}

/// What started the drain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    Signal(String),
    /// Uncaught synchronous fault (panic)
    Fault(String),
    /// Failed background task or unhandled async error
    Rejection(String),
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Signal(name) => write!(f, "signal {}", name),
            ShutdownReason::Fault(details) => write!(f, "uncaught fault: {}", details),
            ShutdownReason::Rejection(details) => write!(f, "unhandled rejection: {}", details),
        }
    }
}
