mod handle;
mod types;
#[cfg(test)]
mod tests;

pub(crate) use handle::name_filter;
pub use handle::ContainerHandle;
pub use types::{StartOutcome, StopOutcome};
