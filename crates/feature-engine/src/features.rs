//! Feature Registry and Extraction
//!
//! Requested feature names are matched against a fixed registry, ignoring
//! case, whitespace, punctuation and underscores. Unknown names are skipped
//! without error. Each feature is computed independently so one failing
//! formula does not discard its siblings.

use crate::error::FeatureError;
use crate::spectral::{compute_spectral_features, wants_spectral, WelchEstimator};
use crate::statistics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Feature result: a number, or the error that prevented it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Value(f64),
    Error(String),
}

impl FeatureValue {
    fn from_result(result: Result<f64, FeatureError>) -> Self {
        match result {
            Ok(v) => FeatureValue::Value(v),
            Err(e) => FeatureValue::Error(format!("error: {}", e)),
        }
    }

    /// Numeric value, if the computation succeeded
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Value(v) => Some(*v),
            FeatureValue::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FeatureValue::Error(_))
    }
}

/// Feature label → value
pub type FeatureMap = BTreeMap<String, FeatureValue>;

/// Every feature the engine knows how to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    Rms,
    StandardDeviation,
    Kurtosis,
    Skewness,
    CrestFactor,
    Max,
    Min,
    Mean,
    Median,
    EstimatedSpeed,
    PeakPsd,
    PeakFrequency,
    SpectrumSkewness,
    SpectrumKurtosis,
}

type TimeFeatureFn = fn(&[f64]) -> Result<f64, FeatureError>;

#[derive(Clone, Copy)]
struct RegistryEntry {
    /// Output key
    label: &'static str,
    /// Normalized names accepted on input
    keys: &'static [&'static str],
    /// Time-domain formula; `None` for spectral features
    compute: Option<TimeFeatureFn>,
}

fn time_entry(label: &'static str, keys: &'static [&'static str], compute: TimeFeatureFn) -> RegistryEntry {
    RegistryEntry { label, keys, compute: Some(compute) }
}

fn spectral_entry(label: &'static str, keys: &'static [&'static str]) -> RegistryEntry {
    RegistryEntry { label, keys, compute: None }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 14] = [
        FeatureKind::Rms,
        FeatureKind::StandardDeviation,
        FeatureKind::Kurtosis,
        FeatureKind::Skewness,
        FeatureKind::CrestFactor,
        FeatureKind::Max,
        FeatureKind::Min,
        FeatureKind::Mean,
        FeatureKind::Median,
        FeatureKind::EstimatedSpeed,
        FeatureKind::PeakPsd,
        FeatureKind::PeakFrequency,
        FeatureKind::SpectrumSkewness,
        FeatureKind::SpectrumKurtosis,
    ];

    /// Look up a requested feature name
    pub fn parse(name: &str) -> Option<Self> {
        let key = normalize_name(name);
        Self::ALL
            .into_iter()
            .find(|kind| kind.entry().keys.contains(&key.as_str()))
    }

    fn entry(&self) -> RegistryEntry {
        match self {
            FeatureKind::Rms => time_entry("RMS", &["rms"], statistics::rms),
            FeatureKind::StandardDeviation => time_entry(
                "StandardDeviation",
                &["standarddeviation", "stddev", "std"],
                statistics::std_dev,
            ),
            FeatureKind::Kurtosis => time_entry("Kurtosis", &["kurtosis"], statistics::kurtosis),
            FeatureKind::Skewness => time_entry("Skewness", &["skewness"], statistics::skewness),
            FeatureKind::CrestFactor => time_entry("CrestFactor", &["crestfactor"], statistics::crest_factor),
            FeatureKind::Max => time_entry("MAX", &["max"], statistics::max),
            FeatureKind::Min => time_entry("MIN", &["min"], statistics::min),
            FeatureKind::Mean => time_entry("MEAN", &["mean"], statistics::mean),
            FeatureKind::Median => time_entry("MEDIAN", &["median"], statistics::median),
            FeatureKind::EstimatedSpeed => {
                spectral_entry("Estimated Speed (RPM)", &["estimatedspeed", "estimatedspeedrpm"])
            }
            FeatureKind::PeakPsd => spectral_entry("Peak PSD", &["peakpsd"]),
            FeatureKind::PeakFrequency => spectral_entry("Peak Frequency (Hz)", &["peakfrequencyhz", "peakfrequency"]),
            FeatureKind::SpectrumSkewness => spectral_entry("Spectrum Skewness", &["spectrumskewness"]),
            FeatureKind::SpectrumKurtosis => spectral_entry("Spectrum Kurtosis", &["spectrumkurtosis"]),
        }
    }

    /// Key used in result mappings
    pub fn label(&self) -> &'static str {
        self.entry().label
    }

    /// Whether this feature is derived from the power spectrum
    pub fn is_spectral(&self) -> bool {
        self.entry().compute.is_none()
    }
}

fn finite(label: &'static str, result: Result<f64, FeatureError>) -> Result<f64, FeatureError> {
    result.and_then(|v| if v.is_finite() { Ok(v) } else { Err(FeatureError::NonFinite(label)) })
}

/// Compute the requested time-domain features.
///
/// Spectral and unknown names are skipped. Every requested feature is an
/// error when any sample is NaN or infinite.
pub fn compute_time_features(samples: &[f64], names: &[String]) -> FeatureMap {
    let mut out = FeatureMap::new();
    let finite_input = samples.iter().all(|v| v.is_finite());
    for name in names {
        let Some(kind) = FeatureKind::parse(name) else {
            debug!("Ignoring unknown feature '{}'", name);
            continue;
        };
        let entry = kind.entry();
        let Some(compute) = entry.compute else {
            continue;
        };

        let result = if finite_input {
            finite(entry.label, compute(samples))
        } else {
            Err(FeatureError::NonFinite(entry.label))
        };
        out.insert(entry.label.to_string(), FeatureValue::from_result(result));
    }
    out
}

/// Feature extractor bound to one sample rate and blade count
pub struct FeatureExtractor {
    /// Welch PSD estimator
    welch: WelchEstimator,
    /// Blades per revolution, for speed estimation
    blade_count: u32,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(sample_rate: f64, blade_count: u32) -> Self {
        Self {
            welch: WelchEstimator::new(sample_rate),
            blade_count,
        }
    }

    /// Extract requested features.
    ///
    /// All five spectral features are added when any requested name is
    /// spectral; the PSD is not computed otherwise.
    pub fn extract(&mut self, samples: &[f64], names: &[String]) -> FeatureMap {
        let mut out = compute_time_features(samples, names);
        if !wants_spectral(names) {
            return out;
        }

        let spectral = [
            FeatureKind::PeakPsd,
            FeatureKind::SpectrumSkewness,
            FeatureKind::SpectrumKurtosis,
            FeatureKind::PeakFrequency,
            FeatureKind::EstimatedSpeed,
        ];

        match compute_spectral_features(&mut self.welch, samples, self.blade_count) {
            Ok(features) => {
                let values = [
                    Ok(features.peak_psd),
                    features.spectrum_skewness,
                    features.spectrum_kurtosis,
                    Ok(features.peak_frequency),
                    Ok(features.estimated_speed_rpm),
                ];
                for (kind, value) in spectral.iter().zip(values) {
                    let value = finite(kind.label(), value);
                    out.insert(kind.label().to_string(), FeatureValue::from_result(value));
                }
            }
            Err(e) => {
                debug!("Spectral estimation failed: {}", e);
                for kind in spectral {
                    out.insert(kind.label().to_string(), FeatureValue::from_result(Err(e.clone())));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_name_matching_is_case_and_spacing_insensitive() {
        assert_eq!(FeatureKind::parse("rms"), Some(FeatureKind::Rms));
        assert_eq!(FeatureKind::parse("Crest Factor"), Some(FeatureKind::CrestFactor));
        assert_eq!(FeatureKind::parse("crest_factor"), Some(FeatureKind::CrestFactor));
        assert_eq!(FeatureKind::parse("MEDIAN"), Some(FeatureKind::Median));
        assert_eq!(FeatureKind::parse("Estimated Speed"), Some(FeatureKind::EstimatedSpeed));
        assert_eq!(FeatureKind::parse("Peak Frequency (Hz)"), Some(FeatureKind::PeakFrequency));
        assert_eq!(FeatureKind::parse("Entropy"), None);
    }

    #[test]
    fn test_every_kind_has_distinct_label() {
        let mut labels: Vec<_> = FeatureKind::ALL.iter().map(|k| k.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), FeatureKind::ALL.len());
    }

    #[test]
    fn test_every_label_parses_back_to_its_kind() {
        for kind in FeatureKind::ALL {
            assert_eq!(FeatureKind::parse(kind.label()), Some(kind), "{}", kind.label());
        }
    }

    #[test]
    fn test_non_finite_samples_yield_error_values() {
        let mut signal: Vec<f64> = (0..1024).map(|i| (i as f64 * 0.3).sin()).collect();
        signal[0] = f64::NAN;
        signal[1] = f64::INFINITY;
        let all: Vec<String> = FeatureKind::ALL.iter().map(|k| k.label().to_string()).collect();

        let out = FeatureExtractor::new(1024.0, 6).extract(&signal, &all);
        assert_eq!(out.len(), FeatureKind::ALL.len());
        for (key, value) in &out {
            assert!(value.is_error(), "{} = {:?}", key, value);
        }
        assert_eq!(out["Kurtosis"], FeatureValue::Error("error: Kurtosis is not finite".into()));
    }

    #[test]
    fn test_unknown_names_ignored() {
        let out = compute_time_features(&[1.0, 2.0, 3.0], &names(&["RMS", "Entropy", "zcr"]));
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("RMS"));
    }

    #[test]
    fn test_failing_feature_isolated() {
        let flat = vec![0.5; 32];
        let out = compute_time_features(&flat, &names(&["RMS", "Kurtosis", "CrestFactor"]));
        assert!((out["RMS"].as_f64().unwrap() - 0.5).abs() < 1e-12);
        assert!((out["CrestFactor"].as_f64().unwrap() - 1.0).abs() < 1e-12);
        match &out["Kurtosis"] {
            FeatureValue::Error(msg) => assert!(msg.starts_with("error:")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_signal_crest_factor() {
        let out = compute_time_features(&[0.0; 64], &names(&["CrestFactor"]));
        assert_eq!(out["CrestFactor"], FeatureValue::Value(0.0));
    }

    #[test]
    fn test_spectral_only_when_requested() {
        let fs = 1024.0;
        let signal: Vec<f64> = (0..1024).map(|i| (2.0 * PI * 64.0 * i as f64 / fs).sin()).collect();
        let mut extractor = FeatureExtractor::new(fs, 6);

        let out = extractor.extract(&signal, &names(&["RMS"]));
        assert!(!out.contains_key("Estimated Speed (RPM)"));

        let out = extractor.extract(&signal, &names(&["RMS", "Estimated Speed"]));
        assert_eq!(out.len(), 6);
        assert!((out["Peak Frequency (Hz)"].as_f64().unwrap() - 64.0).abs() < 1e-9);
        assert!((out["Estimated Speed (RPM)"].as_f64().unwrap() - 640.0).abs() < 1e-6);
    }
}
