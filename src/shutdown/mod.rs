mod coordinator;
mod hooks;
mod types;


pub use coordinator::ShutdownCoordinator;
pub use types::{ShutdownReason, ShutdownState};
