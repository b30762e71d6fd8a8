//! Instruction Types and Merge Rules

use crate::defaults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Axis selection: one column label or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisSpec {
    /// Single axis label
    Single(String),
    /// Ordered axis labels, analysed in this order
    Many(Vec<String>),
}

impl AxisSpec {
    /// Resolve to an ordered list of labels
    pub fn labels(&self) -> Vec<&str> {
        match self {
            AxisSpec::Single(label) => vec![label.as_str()],
            AxisSpec::Many(labels) => labels.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for AxisSpec {
    fn default() -> Self {
        AxisSpec::Single(defaults::AXIS.to_string())
    }
}

impl From<&str> for AxisSpec {
    fn from(label: &str) -> Self {
        AxisSpec::Single(label.to_string())
    }
}

/// Frequency-domain filter method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum FilterMethod {
    /// No filtering
    #[default]
    None,
    /// Band-pass between `low` and `high`
    Bandpass,
    /// Low-pass at `cutoff`
    Lowpass,
    /// High-pass at `cutoff`
    Highpass,
}

impl FilterMethod {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMethod::None => "none",
            FilterMethod::Bandpass => "bandpass_filter",
            FilterMethod::Lowpass => "lowpass_filter",
            FilterMethod::Highpass => "highpass_filter",
        }
    }
}

impl From<String> for FilterMethod {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bandpass_filter" => FilterMethod::Bandpass,
            "lowpass_filter" => FilterMethod::Lowpass,
            "highpass_filter" => FilterMethod::Highpass,
            "" | "none" => FilterMethod::None,
            other => {
                warn!("Unrecognized filter method '{}', passing signal through", other);
                FilterMethod::None
            }
        }
    }
}

impl From<FilterMethod> for &'static str {
    fn from(method: FilterMethod) -> Self {
        method.as_str()
    }
}

/// Processing step applied before feature extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingSpec {
    /// Filter method
    #[serde(default)]
    pub method: FilterMethod,
    /// Numeric parameters (`low`, `high`, `cutoff`)
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl ProcessingSpec {
    /// Band-pass between `low` and `high` Hz
    pub fn bandpass(low: f64, high: f64) -> Self {
        Self {
            method: FilterMethod::Bandpass,
            params: BTreeMap::from([("low".to_string(), low), ("high".to_string(), high)]),
        }
    }

    /// Low-pass at `cutoff` Hz
    pub fn lowpass(cutoff: f64) -> Self {
        Self {
            method: FilterMethod::Lowpass,
            params: BTreeMap::from([("cutoff".to_string(), cutoff)]),
        }
    }

    /// High-pass at `cutoff` Hz
    pub fn highpass(cutoff: f64) -> Self {
        Self {
            method: FilterMethod::Highpass,
            params: BTreeMap::from([("cutoff".to_string(), cutoff)]),
        }
    }

    /// Look up a parameter, falling back to `default`
    pub fn param_or(&self, name: &str, default: f64) -> f64 {
        self.params.get(name).copied().unwrap_or(default)
    }
}

/// One normalized analysis instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Axis or axes to analyse
    #[serde(default)]
    pub axis: AxisSpec,
    /// Filter applied before feature extraction
    #[serde(default)]
    pub processing: ProcessingSpec,
    /// Requested feature names (case-insensitive, unknown names ignored)
    #[serde(default)]
    pub features: Vec<String>,
}

impl Default for Instruction {
    fn default() -> Self {
        Self {
            axis: AxisSpec::default(),
            processing: ProcessingSpec::bandpass(defaults::BANDPASS_LOW_HZ, defaults::BANDPASS_HIGH_HZ),
            features: defaults::FEATURES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Partially specified instruction used to override a baseline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstructionOverride {
    pub axis: Option<AxisSpec>,
    pub processing: Option<ProcessingSpec>,
    pub features: Option<Vec<String>>,
}

impl From<Instruction> for InstructionOverride {
    fn from(instr: Instruction) -> Self {
        Self {
            axis: Some(instr.axis),
            processing: Some(instr.processing),
            features: Some(instr.features),
        }
    }
}

impl Instruction {
    /// Merge an override onto this instruction.
    ///
    /// Axis and processing are replaced wholesale when present; features are
    /// the union of both lists, so the baseline features are always kept.
    pub fn merge(&self, over: &InstructionOverride) -> Instruction {
        let mut merged = self.clone();
        if let Some(axis) = &over.axis {
            merged.axis = axis.clone();
        }
        if let Some(processing) = &over.processing {
            merged.processing = processing.clone();
        }
        if let Some(features) = &over.features {
            merged.features = union_features(&self.features, features);
        }
        merged
    }
}

/// Union of two feature lists, deduplicated case-insensitively
fn union_features(base: &[String], extra: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(base.len() + extra.len());
    for name in base.iter().chain(extra) {
        let name = name.trim();
        if !out.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_features_is_union() {
        let base = Instruction {
            features: names(&["RMS"]),
            ..Default::default()
        };
        let over = InstructionOverride {
            features: Some(names(&["Kurtosis"])),
            ..Default::default()
        };

        let merged = base.merge(&over);
        let mut got = merged.features.clone();
        got.sort();
        assert_eq!(got, names(&["Kurtosis", "RMS"]));
    }

    #[test]
    fn test_merge_replaces_axis_and_processing() {
        let base = Instruction::default();
        let over = InstructionOverride {
            axis: Some(AxisSpec::Many(names(&["X", "Y"]))),
            processing: Some(ProcessingSpec::lowpass(2000.0)),
            features: None,
        };

        let merged = base.merge(&over);
        assert_eq!(merged.axis.labels(), vec!["X", "Y"]);
        assert_eq!(merged.processing.method, FilterMethod::Lowpass);
        assert_eq!(merged.features, base.features);
    }

    #[test]
    fn test_merge_dedups_case_insensitively() {
        let base = Instruction {
            features: names(&["RMS", "Kurtosis"]),
            ..Default::default()
        };
        let over = InstructionOverride {
            features: Some(names(&["rms", "Skewness"])),
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.features.len(), 3);
    }

    #[test]
    fn test_axis_spec_deserializes_both_shapes() {
        let single: AxisSpec = serde_json::from_str("\"X\"").unwrap();
        let many: AxisSpec = serde_json::from_str("[\"X\", \"W\"]").unwrap();
        assert_eq!(single.labels(), vec!["X"]);
        assert_eq!(many.labels(), vec!["X", "W"]);
    }

    #[test]
    fn test_unknown_filter_method_passes_through() {
        let spec: ProcessingSpec =
            serde_json::from_str(r#"{"method": "notch_filter", "params": {"cutoff": 50}}"#).unwrap();
        assert_eq!(spec.method, FilterMethod::None);

        let json = serde_json::to_value(ProcessingSpec::bandpass(10.0, 20.0)).unwrap();
        assert_eq!(json["method"], "bandpass_filter");
    }

    #[test]
    fn test_default_instruction() {
        let instr = Instruction::default();
        assert_eq!(instr.axis, AxisSpec::Single("Z".to_string()));
        assert_eq!(instr.processing.param_or("low", 0.0), 1000.0);
        assert_eq!(instr.processing.param_or("high", 0.0), 3500.0);
        assert_eq!(instr.features.len(), 5);
    }

    proptest! {
        #[test]
        fn prop_merge_keeps_every_feature(
            base in proptest::collection::vec("[A-Za-z]{1,8}", 0..6),
            extra in proptest::collection::vec("[A-Za-z]{1,8}", 0..6),
        ) {
            let instr = Instruction { features: base.clone(), ..Default::default() };
            let merged = instr.merge(&InstructionOverride {
                features: Some(extra.clone()),
                ..Default::default()
            });

            for name in base.iter().chain(&extra) {
                prop_assert!(merged.features.iter().any(|f| f.eq_ignore_ascii_case(name)));
            }
            prop_assert!(merged.features.len() <= base.len() + extra.len());
        }
    }
}
