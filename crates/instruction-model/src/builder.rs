//! Instruction Builders

use crate::defaults;
use crate::instruction::{AxisSpec, Instruction, ProcessingSpec};
use crate::semantics::InstructionSemantics;

fn default_features() -> Vec<String> {
    defaults::FEATURES.iter().map(|f| f.to_string()).collect()
}

/// Build one instruction from extracted semantics.
///
/// A bandpass filter is set up only when both `low_freq` and `high_freq`
/// are present; otherwise no processing is applied.
pub fn build_single(semantics: &InstructionSemantics) -> Instruction {
    let processing = match (semantics.low_freq, semantics.high_freq) {
        (Some(low), Some(high)) => ProcessingSpec::bandpass(low, high),
        _ => ProcessingSpec::default(),
    };

    Instruction {
        axis: semantics.axis.clone().unwrap_or_default(),
        processing,
        features: semantics.features.clone().unwrap_or_else(default_features),
    }
}

/// Build an ordered batch of instructions.
///
/// Processing is taken verbatim from each entry when present.
pub fn build_batch(list: &[InstructionSemantics]) -> Vec<Instruction> {
    list.iter()
        .map(|semantics| Instruction {
            axis: semantics.axis.clone().unwrap_or_else(AxisSpec::default),
            processing: semantics.processing.clone().unwrap_or_default(),
            features: semantics.features.clone().unwrap_or_else(default_features),
        })
        .collect()
}
