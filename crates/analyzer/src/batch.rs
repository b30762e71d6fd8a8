//! Batch Orchestrator

use crate::error::AnalysisError;
use crate::result::{AxisFailure, AxisOutcome, FeatureResult};
use crate::settings::AnalyzerConfig;
use feature_engine::{FeatureExtractor, DEFAULT_BLADE_COUNT};
use instruction_model::{defaults, Instruction};
use signal_conditioning::{apply_filter, condition_axis, FilterKind, SignalError, SignalTable};
use std::path::Path;
use tracing::{debug, info, warn};

/// Runs instructions against a recording, one record per (instruction, axis)
#[derive(Debug, Clone, Copy)]
pub struct BatchAnalyzer {
    /// Sample rate (Hz); also the number of samples analysed per axis
    sample_rate: u32,
    /// Blades per revolution
    blade_count: u32,
}

impl BatchAnalyzer {
    /// Create an analyzer with the default blade count
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            blade_count: DEFAULT_BLADE_COUNT,
        }
    }

    pub fn with_blade_count(mut self, blade_count: u32) -> Self {
        self.blade_count = blade_count;
        self
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self::new(config.sample_rate_hz).with_blade_count(config.blade_count)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn extractor(&self) -> FeatureExtractor {
        FeatureExtractor::new(f64::from(self.sample_rate), self.blade_count)
    }

    /// Load the recording once and run every instruction against it
    pub fn analyze_batch(
        &self,
        table_path: impl AsRef<Path>,
        instructions: &[Instruction],
    ) -> Result<Vec<AxisOutcome>, AnalysisError> {
        let table = SignalTable::from_path(table_path)?;
        Ok(self.analyze_table(&table, instructions))
    }

    /// Run every instruction against an already loaded table.
    ///
    /// Output order follows instruction order, then axis order within each
    /// instruction. A failing axis yields a failure record in its slot.
    pub fn analyze_table(&self, table: &SignalTable, instructions: &[Instruction]) -> Vec<AxisOutcome> {
        let mut extractor = self.extractor();
        let mut outcomes = Vec::new();

        for (index, instruction) in instructions.iter().enumerate() {
            let axes = instruction.axis.labels();
            debug!("Instruction {}: {} axes, method {}", index, axes.len(), instruction.processing.method.as_str());

            for axis in axes {
                outcomes.push(self.run_axis(table, axis, instruction, &mut extractor));
            }
        }

        info!(
            "Analysed {} instructions into {} records ({} failed)",
            instructions.len(),
            outcomes.len(),
            outcomes.iter().filter(|o| o.is_failure()).count()
        );
        outcomes
    }

    /// Run one instruction on exactly one axis, loading the recording
    pub fn analyze_single(
        &self,
        table_path: impl AsRef<Path>,
        instruction: &Instruction,
    ) -> Result<AxisOutcome, AnalysisError> {
        let table = SignalTable::from_path(table_path)?;
        Ok(self.analyze_single_table(&table, instruction))
    }

    /// Run one instruction on its first axis.
    ///
    /// An instruction with an empty axis list falls back to the default axis.
    pub fn analyze_single_table(&self, table: &SignalTable, instruction: &Instruction) -> AxisOutcome {
        let axis = instruction
            .axis
            .labels()
            .first()
            .copied()
            .unwrap_or(defaults::AXIS);
        let mut extractor = self.extractor();
        self.run_axis(table, axis, instruction, &mut extractor)
    }

    fn run_axis(
        &self,
        table: &SignalTable,
        axis: &str,
        instruction: &Instruction,
        extractor: &mut FeatureExtractor,
    ) -> AxisOutcome {
        match self.analyze_axis(table, axis, instruction, extractor) {
            Ok(result) => AxisOutcome::Features(result),
            Err(e) => {
                warn!("Axis '{}' failed: {}", axis, e);
                AxisOutcome::Failed(AxisFailure {
                    axis: axis.to_string(),
                    error: e.to_string(),
                })
            }
        }
    }

    fn analyze_axis(
        &self,
        table: &SignalTable,
        axis: &str,
        instruction: &Instruction,
        extractor: &mut FeatureExtractor,
    ) -> Result<FeatureResult, SignalError> {
        // Checked first so no conditioning work happens for absent axes
        if !table.has_column(axis) {
            return Err(SignalError::AxisNotFound(axis.to_string()));
        }

        let fs = self.sample_rate as usize;
        let samples = condition_axis(table, axis, fs)?;
        let filtered = apply_filter(&samples, f64::from(self.sample_rate), &instruction.processing)?;
        let features = extractor.extract(&filtered, &instruction.features);

        Ok(FeatureResult {
            axis: axis.to_string(),
            method: FilterKind::from_processing(&instruction.processing).method(),
            features,
        })
    }
}

/// Analyse a recording file with the default blade count
pub fn analyze_batch(
    table_path: impl AsRef<Path>,
    fs: u32,
    instructions: &[Instruction],
) -> Result<Vec<AxisOutcome>, AnalysisError> {
    BatchAnalyzer::new(fs).analyze_batch(table_path, instructions)
}

/// Analyse one instruction on one axis of a recording file
pub fn analyze_single(
    table_path: impl AsRef<Path>,
    fs: u32,
    instruction: &Instruction,
) -> Result<AxisOutcome, AnalysisError> {
    BatchAnalyzer::new(fs).analyze_single(table_path, instruction)
}
