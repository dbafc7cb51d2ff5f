mod mock;
mod runner;

pub use mock::{MockCommandRunner, MockResponse, RecordedCall};
pub use runner::{CommandOutput, CommandRunner, ShellRunner};
