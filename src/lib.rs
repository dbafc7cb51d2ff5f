pub mod commands;
pub mod config;
pub mod container;
pub mod error;
pub mod exec;
pub mod logging;
pub mod probe;
pub mod shutdown;

#[cfg(feature = "server")]
pub mod server;

pub use commands::{Command, Console, InfraManager, StartSummary, StatusReport, StopSummary, Tone};
pub use config::{DependencyConfig, InfraConfig, PortConfig, ServerConfig, ServerEnvironment};
pub use container::{ContainerHandle, StartOutcome, StopOutcome};
pub use error::{InfraError, Result};
pub use exec::{CommandOutput, CommandRunner, MockCommandRunner, MockResponse, ShellRunner};
pub use logging::{init_logging, LogOptions};
pub use probe::{HealthOutcome, HealthTarget, HealthWaiter, HttpReachability, PortProbe, ReachabilityCheck};
pub use shutdown::{ShutdownCoordinator, ShutdownReason, ShutdownState};

#[cfg(feature = "server")]
pub use server::{ApiError, ApiServer};
