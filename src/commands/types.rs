use crate::config::{DependencyConfig, PortConfig};
use crate::container::{StartOutcome, StopOutcome};
use crate::error::InfraError;
use crate::probe::HealthOutcome;
use std::fmt;
use std::str::FromStr;

/// Verbs accepted by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Restart,
    Status,
    Test,
    Docker,
    Help,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Start,
        Command::Stop,
        Command::Restart,
        Command::Status,
        Command::Test,
        Command::Docker,
        Command::Help,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Restart => "restart",
            Command::Status => "status",
            Command::Test => "test",
            Command::Docker => "docker",
            Command::Help => "help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Start infrastructure containers and wait until they are ready",
            Command::Stop => "Stop infrastructure containers and local dev processes",
            Command::Restart => "Stop, pause briefly, then start infrastructure",
            Command::Status => "Show container and port status",
            Command::Test => "Run the infrastructure test script",
            Command::Docker => "Start the full compose development stack",
            Command::Help => "Show this help message",
        }
    }

    /// Whether the verb touches anything the configuration describes
    pub fn needs_config(&self) -> bool {
        !matches!(self, Command::Help)
    }
}

impl FromStr for Command {
    type Err = InfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| InfraError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What `start` observed for one dependency
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyReport {
    pub name: String,
    pub display_name: String,
    pub start: StartOutcome,
    /// `None` when the dependency declares no health URL
    pub health: Option<HealthOutcome>,
}

impl DependencyReport {
    pub fn new(dependency: &DependencyConfig, start: StartOutcome) -> Self {
        Self {
            name: dependency.name.clone(),
            display_name: dependency.display_name.clone(),
            start,
            health: None,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.start.is_success() && self.health.map_or(true, |h| h.is_ready())
    }

    pub fn describe(&self) -> String {
        let start = match &self.start {
            StartOutcome::Started => "started".to_string(),
            StartOutcome::AlreadyRunning => "already running".to_string(),
            StartOutcome::Failed(reason) => format!("failed to start ({})", reason),
        };

        let health = match self.health {
            Some(HealthOutcome::Ready { .. }) => "ready".to_string(),
            Some(HealthOutcome::TimedOut { attempts }) => {
                format!("not ready after {} attempts", attempts)
            }
            None => "no health check".to_string(),
        };

        format!("{}, {}", start, health)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StartSummary {
    pub dependencies: Vec<DependencyReport>,
}

impl StartSummary {
    pub fn get(&self, name: &str) -> Option<&DependencyReport> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    pub fn is_fully_ready(&self) -> bool {
        self.dependencies.iter().all(DependencyReport::is_healthy)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StopSummary {
    pub dependencies: Vec<(String, StopOutcome)>,
    pub dev_processes_stopped: bool,
}

impl StopSummary {
    pub fn get(&self, name: &str) -> Option<&StopOutcome> {
        self.dependencies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    pub fn is_clean(&self) -> bool {
        self.dependencies.iter().all(|(_, o)| o.is_success())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortStatus {
    pub port: PortConfig,
    pub in_use: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusReport {
    /// Engine's container table, `None` when the query failed
    pub containers: Option<String>,
    pub ports: Vec<PortStatus>,
}
