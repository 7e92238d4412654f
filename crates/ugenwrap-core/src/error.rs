//! Error types for ugenwrap-core.

use thiserror::Error;

/// Error type for parameter marshalling, buffer access and client processing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("wrong number of arguments: expected {expected}, got {received}")]
    ArityMismatch { expected: usize, received: usize },

    #[error("{param}: {message}")]
    Constraint { param: String, message: String },

    #[error("{0}")]
    Processing(String),

    #[error("Unknown buffer: {0}")]
    UnknownBuffer(i64),

    #[error("Buffer {id} has {samples} samples, expected {frames} frames x {channels} channels")]
    BufferShape {
        id: i64,
        frames: usize,
        channels: usize,
        samples: usize,
    },

    #[error("Parameter {index} is not a {expected} parameter")]
    ParamType {
        index: usize,
        expected: &'static str,
    },
}

impl Error {
    /// Shorthand for a batch-processing failure carrying a human-readable message.
    pub fn processing(message: impl Into<String>) -> Self {
        Self::Processing(message.into())
    }

    pub fn constraint(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Constraint {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
