mod health;
mod port;
#[cfg(test)]
mod tests;

pub use health::{HealthOutcome, HealthTarget, HealthWaiter, HttpReachability, ReachabilityCheck};
pub use port::PortProbe;
