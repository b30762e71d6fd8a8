//! Instruction Error Types

use thiserror::Error;

/// Errors raised while reading instruction input
#[derive(Debug, Error)]
pub enum InstructionError {
    /// Text generator reply did not contain a usable JSON object
    #[error("Malformed instruction reply: {0}")]
    MalformedReply(String),

    /// Instruction document could not be decoded
    #[error("Invalid instruction document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}
