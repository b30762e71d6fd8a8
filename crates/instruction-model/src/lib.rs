//! Analysis Instruction Model
//!
//! Normalized shape of a vibration analysis instruction (axis selection,
//! frequency-domain processing, requested features) plus the defaulting and
//! merge rules applied to partially specified input.

mod builder;
mod error;
mod instruction;
mod semantics;

pub use builder::{build_batch, build_single};
pub use error::InstructionError;
pub use instruction::{AxisSpec, FilterMethod, Instruction, InstructionOverride, ProcessingSpec};
pub use semantics::InstructionSemantics;

/// Default processing and feature constants
pub mod defaults {
    /// Axis used when none is supplied
    pub const AXIS: &str = "Z";
    /// Bandpass lower corner (Hz)
    pub const BANDPASS_LOW_HZ: f64 = 1000.0;
    /// Bandpass upper corner (Hz)
    pub const BANDPASS_HIGH_HZ: f64 = 3500.0;
    /// Lowpass cutoff (Hz)
    pub const LOWPASS_CUTOFF_HZ: f64 = 3000.0;
    /// Highpass cutoff (Hz)
    pub const HIGHPASS_CUTOFF_HZ: f64 = 1000.0;
    /// Feature baseline used when none is supplied
    pub const FEATURES: [&str; 5] = ["RMS", "Skewness", "Kurtosis", "CrestFactor", "Estimated Speed"];
}
