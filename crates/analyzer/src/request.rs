//! Single-request pipeline: text in, features and summary out

use crate::batch::BatchAnalyzer;
use crate::collaborators::{SemanticExtractor, SummaryGenerator, TextGenerator};
use crate::error::AnalysisError;
use crate::result::AxisOutcome;
use instruction_model::{build_single, Instruction, InstructionOverride, InstructionSemantics};
use serde::Serialize;
use signal_conditioning::SignalTable;
use tracing::{info, warn};

/// Everything produced for one analysis request
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Instruction actually executed
    pub instruction: Instruction,
    /// Feature record for the analysed axis
    pub features: AxisOutcome,
    /// Generator summary, verbatim
    pub summary: String,
}

/// Extract an instruction from `text`, merge it over `baseline`, analyse one
/// axis and summarise.
///
/// An unreadable extraction reply degrades to empty semantics (all
/// defaults); generator transport failures abort the request.
pub fn analyze_request<G: TextGenerator + ?Sized>(
    generator: &G,
    analyzer: &BatchAnalyzer,
    table: &SignalTable,
    baseline: &Instruction,
    text: &str,
) -> Result<AnalysisReport, AnalysisError> {
    let semantics = match SemanticExtractor::new(generator).extract(text) {
        Ok(semantics) => semantics,
        Err(AnalysisError::Instruction(e)) => {
            warn!("Falling back to default instruction: {}", e);
            InstructionSemantics::default()
        }
        Err(e) => return Err(e),
    };

    let extracted = build_single(&semantics);
    let instruction = baseline.merge(&InstructionOverride::from(extracted));
    info!("Executing instruction: {:?}", instruction);

    let features = analyzer.analyze_single_table(table, &instruction);
    let summary = SummaryGenerator::new(generator).summarize(&features)?;

    Ok(AnalysisReport {
        instruction,
        features,
        summary,
    })
}
