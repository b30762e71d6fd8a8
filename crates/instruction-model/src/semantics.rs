//! Loosely structured instruction input
//!
//! Upstream extraction hands over a JSON object with any subset of the keys
//! below. Missing keys are never an error; defaults are applied by the
//! builders.

use crate::error::InstructionError;
use crate::instruction::{AxisSpec, ProcessingSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Extracted analysis semantics, every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSemantics")]
pub struct InstructionSemantics {
    /// Axis label or list of labels
    pub axis: Option<AxisSpec>,
    /// Bandpass lower corner (Hz)
    pub low_freq: Option<f64>,
    /// Bandpass upper corner (Hz); also read from `high_freg`
    pub high_freq: Option<f64>,
    /// Requested feature names
    pub features: Option<Vec<String>>,
    /// Explicit processing step
    pub processing: Option<ProcessingSpec>,
    /// Analysis tool hint (`tsa`, `fft`, `stft`); carried but not interpreted
    pub tool: Option<String>,
}

/// Wire shape: `high_freg` is a separate key so a reply carrying both
/// spellings still parses.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSemantics {
    axis: Option<AxisSpec>,
    low_freq: Option<f64>,
    high_freq: Option<f64>,
    high_freg: Option<f64>,
    features: Option<Vec<String>>,
    processing: Option<ProcessingSpec>,
    tool: Option<String>,
}

impl From<RawSemantics> for InstructionSemantics {
    fn from(raw: RawSemantics) -> Self {
        Self {
            axis: raw.axis,
            low_freq: raw.low_freq,
            high_freq: raw.high_freq.or(raw.high_freg),
            features: raw.features,
            processing: raw.processing,
            tool: raw.tool,
        }
    }
}

impl InstructionSemantics {
    /// Parse a text-generator reply.
    ///
    /// The reply may wrap the JSON object in a markdown code fence, with or
    /// without a language tag.
    pub fn from_reply(reply: &str) -> Result<Self, InstructionError> {
        let body = strip_code_fence(reply);
        if body.is_empty() {
            return Err(InstructionError::MalformedReply("empty reply".to_string()));
        }

        let semantics: Self = serde_json::from_str(body)
            .map_err(|e| InstructionError::MalformedReply(e.to_string()))?;
        debug!("Parsed instruction semantics: {:?}", semantics);
        Ok(semantics)
    }

    /// Parse a list of semantics from a JSON document (object or array)
    pub fn list_from_json(doc: &str) -> Result<Vec<Self>, InstructionError> {
        let value: serde_json::Value = serde_json::from_str(doc)?;
        let list = match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<Self>, _>>()?,
            other => vec![serde_json::from_value(other)?],
        };
        Ok(list)
    }
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    // Language tag, if any, may sit on the fence line or run straight into the body
    let after = trimmed[start + 3..].trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    match after.find("```") {
        Some(end) => after[..end].trim(),
        None => after.trim(),
    }
}
