use crate::error::{InfraError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Exit status and captured output of one external command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Best human-readable explanation of a failed run
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }

        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }

        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Boundary to the host's process engine and shell tools.
///
/// `Err` is reserved for commands that could not be launched at all; a
/// command that ran and exited non-zero is an `Ok` with a failing code.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a shell command line and capture stdout/stderr
    async fn run(&self, command: &str) -> Result<CommandOutput>;

    /// Run a program attached to the caller's terminal and return its exit code
    async fn run_attached(&self, program: &str, args: &[String]) -> Result<Option<i32>>;
}

/// Runs commands through `sh -c` on the local host
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        debug!("Running: {}", command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| InfraError::command(command.to_string(), e.to_string()))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!("`{}` exited with {:?}", command, result.code);
        Ok(result)
    }

    async fn run_attached(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        debug!("Running attached: {} {:?}", program, args);

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| InfraError::command(program.to_string(), e.to_string()))?;

        Ok(status.code())
    }
}
