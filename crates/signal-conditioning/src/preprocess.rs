//! Axis Extraction and Amplitude Normalization

use crate::error::SignalError;
use crate::table::SignalTable;
use tracing::debug;

/// Select the first `fs` samples (one second) of an axis.
///
/// Shorter recordings are used in full.
pub fn extract_axis(table: &SignalTable, axis: &str, fs: usize) -> Result<Vec<f64>, SignalError> {
    let column = table.column(axis)?;
    if column.is_empty() {
        return Err(SignalError::EmptySignal(axis.to_string()));
    }

    let take = column.len().min(fs);
    if take < fs {
        debug!("Axis '{}' has {} samples, fewer than fs={}", axis, column.len(), fs);
    }
    Ok(column[..take].to_vec())
}

/// Subtract the arithmetic mean
pub fn remove_dc(samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples.iter().map(|v| v - mean).collect()
}

/// Rescale linearly to [-1, 1].
///
/// A constant signal is returned unchanged.
pub fn normalize(samples: &[f64]) -> Vec<f64> {
    let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if samples.is_empty() || range == 0.0 {
        return samples.to_vec();
    }

    samples
        .iter()
        .map(|v| (2.0 * (v - min) / range - 1.0).clamp(-1.0, 1.0))
        .collect()
}

/// Extract, remove DC and normalize one axis
pub fn condition_axis(table: &SignalTable, axis: &str, fs: usize) -> Result<Vec<f64>, SignalError> {
    let raw = extract_axis(table, axis, fs)?;
    Ok(normalize(&remove_dc(&raw)))
}
