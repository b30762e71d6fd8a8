//! Analysis Error Types

use instruction_model::InstructionError;
use signal_conditioning::SignalError;
use thiserror::Error;

/// Errors that abort an analysis call
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Recording could not be loaded
    #[error("Recording error: {0}")]
    Recording(#[from] SignalError),

    /// Instruction input could not be read
    #[error("Instruction error: {0}")]
    Instruction(#[from] InstructionError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// Configuration loaded but invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Text generation service failed
    #[error("Text generator error: {0}")]
    Generator(String),

    /// Result serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O failure outside the recording
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
