use super::runner::{CommandOutput, CommandRunner};
use crate::error::{InfraError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::time::Instant;
use tracing::debug;

/// Scripted reply for a command matched by a [`MockCommandRunner`] rule
#[derive(Debug, Clone)]
pub enum MockResponse {
    Output(CommandOutput),
    SpawnError(String),
}

impl MockResponse {
    pub fn ok(stdout: &str) -> Self {
        Self::Output(CommandOutput {
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn fail(code: i32, stderr: &str) -> Self {
        Self::Output(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }
}

/// One invocation seen by the mock, stamped with tokio's clock
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: String,
    pub at: Instant,
}

struct Rule {
    pattern: String,
    responses: VecDeque<MockResponse>,
}

/// Fake command runner for exercising orchestration logic without a process engine.
///
/// Rules match by substring in registration order. A rule with several queued
/// responses hands them out one per call and keeps repeating the last one.
/// Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct MockCommandRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every command containing `pattern` with `response`
    pub fn on(&self, pattern: &str, response: MockResponse) -> &Self {
        self.on_sequence(pattern, vec![response])
    }

    /// Reply to successive matching commands with `responses` in order
    pub fn on_sequence(&self, pattern: &str, responses: Vec<MockResponse>) -> &Self {
        self.rules.lock().push(Rule {
            pattern: pattern.to_string(),
            responses: responses.into(),
        });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.command.clone()).collect()
    }

    pub fn count_matching(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.command.contains(pattern))
            .count()
    }

    fn respond(&self, command: &str) -> MockResponse {
        self.calls.lock().push(RecordedCall {
            command: command.to_string(),
            at: Instant::now(),
        });

        let mut rules = self.rules.lock();
        let Some(rule) = rules.iter_mut().find(|r| command.contains(&r.pattern)) else {
            return MockResponse::ok("");
        };

        let response = if rule.responses.len() > 1 {
            rule.responses.pop_front()
        } else {
            rule.responses.front().cloned()
        };

        response.unwrap_or_else(|| MockResponse::ok(""))
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput> {
        debug!("Mock run: {}", command);
        match self.respond(command) {
            MockResponse::Output(output) => Ok(output),
            MockResponse::SpawnError(message) => {
                Err(InfraError::command(command.to_string(), message))
            }
        }
    }

    async fn run_attached(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        let command = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");

        match self.respond(&command) {
            MockResponse::Output(output) => Ok(output.code),
            MockResponse::SpawnError(message) => Err(InfraError::command(command, message)),
        }
    }
}
