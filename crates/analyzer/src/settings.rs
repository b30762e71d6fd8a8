//! Analyzer configuration

use crate::error::AnalysisError;
use feature_engine::DEFAULT_BLADE_COUNT;
use instruction_model::Instruction;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable prefix, e.g. `VIBRATION_SAMPLE_RATE_HZ`
pub const ENV_PREFIX: &str = "VIBRATION";

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Sample rate of uploaded recordings (Hz)
    pub sample_rate_hz: u32,

    /// Blades per revolution, for speed estimation
    pub blade_count: u32,

    /// Log level (`trace`, `debug`, `info`, `warn`, `error`)
    pub log_level: String,

    /// Baseline instruction merged under extracted instructions
    pub default_instruction: Instruction,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 10240,
            blade_count: DEFAULT_BLADE_COUNT,
            log_level: "info".to_string(),
            default_instruction: Instruction::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load from an optional file, then `VIBRATION_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, AnalysisError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let loaded: Self = builder.build()?.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.sample_rate_hz == 0 {
            return Err(AnalysisError::Config("sample_rate_hz must be positive".to_string()));
        }
        if self.blade_count == 0 {
            return Err(AnalysisError::Config("blade_count must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = AnalyzerConfig::default();
        assert_eq!(cfg.sample_rate_hz, 10240);
        assert_eq!(cfg.blade_count, 6);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let cfg = AnalyzerConfig {
            blade_count: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("vibration-config-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"sample_rate_hz": 20480, "default_instruction": {{"axis": "X", "features": ["RMS"]}}}}"#
        )
        .unwrap();
        drop(file);

        let cfg = AnalyzerConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cfg.sample_rate_hz, 20480);
        assert_eq!(cfg.blade_count, 6);
        assert_eq!(cfg.default_instruction.axis.labels(), vec!["X"]);
        assert_eq!(cfg.default_instruction.features, vec!["RMS".to_string()]);
    }
}
