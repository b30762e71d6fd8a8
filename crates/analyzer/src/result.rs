//! Per-axis Result Records

use feature_engine::{FeatureMap, FeatureValue};
use instruction_model::FilterMethod;
use serde::Serialize;

/// Features computed for one (instruction, axis) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureResult {
    pub axis: String,
    /// Filter method actually applied
    pub method: FilterMethod,
    #[serde(flatten)]
    pub features: FeatureMap,
}

/// Failure record occupying the position of a pair that could not be analysed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisFailure {
    pub axis: String,
    pub error: String,
}

/// Outcome of one (instruction, axis) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisOutcome {
    Features(FeatureResult),
    Failed(AxisFailure),
}

impl AxisOutcome {
    /// Axis label this record belongs to
    pub fn axis(&self) -> &str {
        match self {
            AxisOutcome::Features(r) => &r.axis,
            AxisOutcome::Failed(f) => &f.axis,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AxisOutcome::Failed(_))
    }

    /// Look up a feature value by its result key
    pub fn feature(&self, key: &str) -> Option<&FeatureValue> {
        match self {
            AxisOutcome::Features(r) => r.features.get(key),
            AxisOutcome::Failed(_) => None,
        }
    }

    /// Error message, for failure records
    pub fn error(&self) -> Option<&str> {
        match self {
            AxisOutcome::Failed(f) => Some(&f.error),
            AxisOutcome::Features(_) => None,
        }
    }
}
