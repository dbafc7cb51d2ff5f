mod console;
mod dispatch;
mod extras;
mod manager;
mod restart;
mod start;
mod status;
mod stop;
mod types;

#[cfg(test)]
mod tests;

pub use console::{Console, Tone};
pub use manager::InfraManager;
pub use types::{
    Command, DependencyReport, PortStatus, StartSummary, StatusReport, StopSummary,
};
