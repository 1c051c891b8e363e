//! Error types for stack mutation, layer loading and dumping.

use thiserror::Error;

/// Errors returned by fallible stack operations.
#[derive(Debug, Error)]
pub enum StackError {
    /// A mutation targeted a layer outside `[0, len)`.
    #[error("invalid layer index {index} (stack has {len} layers)")]
    InvalidLayer { index: usize, len: usize },
    /// Reading a layer or options file failed.
    #[error("failed to read layer: {0}")]
    ReadFailed(#[source] std::io::Error),
    /// Parsing JSON5 contents failed.
    #[error("failed to parse layer: {0}")]
    ParseFailed(#[from] json5::Error),
    /// Converting JSON values failed.
    #[error("failed to decode layer: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A document that must be an object was something else.
    #[error("{0} must be an object")]
    NotAMapping(String),
    /// Writing the table to a sink failed.
    #[error("failed to write table: {0}")]
    WriteFailed(#[source] std::io::Error),
}
