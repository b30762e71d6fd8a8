//! Signal Error Types

use thiserror::Error;

/// Errors raised while loading or conditioning a signal
#[derive(Debug, Error)]
pub enum SignalError {
    /// Requested axis is not a column of the table
    #[error("Axis '{0}' not found in data")]
    AxisNotFound(String),

    /// Column holds a value that is not a number
    #[error("Axis '{axis}' is not numeric: row {row} holds '{value}'")]
    NonNumeric {
        axis: String,
        row: usize,
        value: String,
    },

    /// Column has no samples
    #[error("Axis '{0}' has no samples")]
    EmptySignal(String),

    /// Filter corner frequency outside (0, Nyquist)
    #[error("{param} value {value} Hz is out of range (0, {nyquist}) Hz")]
    FilterParameter {
        param: &'static str,
        value: f64,
        nyquist: f64,
    },

    /// Bandpass corners not ordered
    #[error("Bandpass low corner {low} Hz must be below high corner {high} Hz")]
    InvalidBand { low: f64, high: f64 },

    /// Unsupported filter order
    #[error("Filter order {0} is not supported (must be even and non-zero)")]
    InvalidOrder(usize),

    /// Sample rate must be positive
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    /// Recording has no header row
    #[error("Recording has no header row")]
    MissingHeader,

    /// Malformed CSV content
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure while reading the recording
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
