//! Feature Error Types

use thiserror::Error;

/// Errors raised by a single feature computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// No samples to compute on
    #[error("signal is empty")]
    EmptySignal,

    /// Not enough samples for the estimator
    #[error("need at least {required} samples, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    /// Standardized moment of a constant signal
    #[error("{0} undefined for zero-variance data")]
    ZeroVariance(&'static str),

    /// Result is NaN or infinite
    #[error("{0} is not finite")]
    NonFinite(&'static str),

    /// Sample rate must be positive
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    /// Blade count must be positive
    #[error("blade count must be positive")]
    InvalidBladeCount,
}
