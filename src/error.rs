use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Process engine is not reachable ({details}). Please start Docker first.")]
    EngineUnavailable { details: String },

    #[error("Failed to run `{command}`: {message}")]
    Command { command: String, message: String },

    #[error("Script {script} failed with exit code {code}")]
    Script { script: String, code: i32 },

    #[error("Compose stack failed: {message}")]
    Compose { message: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Server error: {message}")]
    Server { message: String },

    #[error("System error: {message}")]
    System { message: String },
}

impl InfraError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn command<S: Into<String>>(command: S, message: S) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InfraError>;
