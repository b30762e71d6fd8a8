//! Vibration Analysis Pipeline
//!
//! Runs analysis instructions against a multi-axis vibration recording:
//! each (instruction, axis) pair is conditioned, filtered and reduced to a
//! feature record. Failures are isolated per axis and reported in place.

mod batch;
mod collaborators;
mod error;
mod logging;
mod request;
mod result;
mod settings;

pub use batch::{analyze_batch, analyze_single, BatchAnalyzer};
pub use collaborators::{SemanticExtractor, SummaryGenerator, TextGenerator};
pub use error::AnalysisError;
pub use logging::init_logging;
pub use request::{analyze_request, AnalysisReport};
pub use result::{AxisFailure, AxisOutcome, FeatureResult};
pub use settings::AnalyzerConfig;
