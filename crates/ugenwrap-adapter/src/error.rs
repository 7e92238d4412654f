//! Error types for adapter registration and command dispatch

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrapperError {
    #[error(transparent)]
    Core(#[from] ugenwrap_core::Error),

    #[error("Invalid adapter configuration: {0}")]
    InvalidConfig(String),

    #[error("{kind} already registered: {name}")]
    AlreadyRegistered { kind: &'static str, name: String },

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Async command queue full ({capacity} commands in flight)")]
    SchedulerFull { capacity: usize },

    #[error("Host has shut down")]
    ShutDown,

    #[error("Completion payload could not be decoded: {0}")]
    CompletionDecode(String),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WrapperError>;
