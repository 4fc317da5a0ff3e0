//! Engine client error types

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to spawn engine: {0}")]
    Spawn(String),

    #[error("Failed to write to engine: {0}")]
    Write(String),

    #[error("Failed to read from engine: {0}")]
    Read(String),

    #[error("Engine closed its output while waiting for '{0}'")]
    Closed(&'static str),

    #[error("Timed out after {waited:?} waiting for '{expected}'")]
    Timeout {
        expected: &'static str,
        waited: Duration,
    },
}
