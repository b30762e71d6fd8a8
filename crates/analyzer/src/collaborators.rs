//! Text-generation collaborators
//!
//! Instruction extraction and summary writing are delegated to an opaque
//! text generator. This module only builds prompts and reads replies.

use crate::error::AnalysisError;
use instruction_model::InstructionSemantics;
use serde::Serialize;
use tracing::debug;

/// Prompt in, free-form text out
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Turns a natural-language request into instruction semantics
pub struct SemanticExtractor<'a, G: TextGenerator + ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> SemanticExtractor<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    /// Extraction prompt for a user request
    pub fn prompt(user_input: &str) -> String {
        format!(
            "Extract vibration analysis parameters from the request below and reply with \
             a single JSON object using only these optional keys:\n\
             \x20 \"axis\": \"X\", \"Y\" or \"Z\" (or a list of them),\n\
             \x20 \"low_freq\": bandpass lower corner in Hz,\n\
             \x20 \"high_freq\": bandpass upper corner in Hz,\n\
             \x20 \"features\": any of [\"RMS\", \"StandardDeviation\", \"Kurtosis\", \"Skewness\", \
             \"CrestFactor\", \"MAX\", \"MIN\", \"MEAN\", \"MEDIAN\", \"Estimated Speed\", \"Peak PSD\", \
             \"Peak Frequency (Hz)\", \"Spectrum Skewness\", \"Spectrum Kurtosis\"],\n\
             \x20 \"tool\": \"tsa\", \"fft\" or \"stft\".\n\
             Omit keys the request does not mention.\n\n\
             Example: \"filter the Z axis between 1500 and 4000 Hz and compute the crest factor\"\n\
             -> {{\"axis\": \"Z\", \"low_freq\": 1500, \"high_freq\": 4000, \"features\": [\"CrestFactor\"]}}\n\n\
             Request:\n{}\n",
            user_input
        )
    }

    /// Ask the generator and parse its reply
    pub fn extract(&self, user_input: &str) -> Result<InstructionSemantics, AnalysisError> {
        let reply = self.generator.generate(&Self::prompt(user_input))?;
        debug!("Extraction reply: {}", reply);
        Ok(InstructionSemantics::from_reply(&reply)?)
    }
}

/// Produces a descriptive summary of analysis results
pub struct SummaryGenerator<'a, G: TextGenerator + ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> SummaryGenerator<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    /// Summary prompt embedding the results as JSON
    pub fn prompt<T: Serialize + ?Sized>(results: &T) -> Result<String, AnalysisError> {
        let data = serde_json::to_string_pretty(results)?;
        Ok(format!(
            "The following are statistical and spectral features of a machine vibration \
             recording:\n\n{}\n\n\
             Assess whether the machine is operating normally, point out likely causes of \
             any anomaly, say whether maintenance is needed and give recommendations.",
            data
        ))
    }

    /// Summary text, returned verbatim
    pub fn summarize<T: Serialize + ?Sized>(&self, results: &T) -> Result<String, AnalysisError> {
        self.generator.generate(&Self::prompt(results)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Scripted {
        reply: String,
        prompts: RefCell<Vec<String>>,
    }

    impl TextGenerator for Scripted {
        fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn scripted(reply: &str) -> Scripted {
        Scripted {
            reply: reply.to_string(),
            prompts: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn test_extract_parses_fenced_reply() {
        let generator = scripted("```json\n{\"axis\": \"X\", \"features\": [\"RMS\"]}\n```");
        let semantics = SemanticExtractor::new(&generator).extract("RMS of X please").unwrap();
        assert_eq!(semantics.features, Some(vec!["RMS".to_string()]));
        assert!(generator.prompts.borrow()[0].contains("RMS of X please"));
    }

    #[test]
    fn test_extract_reports_malformed_reply() {
        let generator = scripted("I could not understand.");
        let err = SemanticExtractor::new(&generator).extract("?").unwrap_err();
        assert!(matches!(err, AnalysisError::Instruction(_)));
    }

    #[test]
    fn test_summary_prompt_embeds_results() {
        let generator = scripted("All good.");
        let results = serde_json::json!([{"axis": "X", "RMS": 0.42}]);
        let summary = SummaryGenerator::new(&generator).summarize(&results).unwrap();
        assert_eq!(summary, "All good.");
        assert!(generator.prompts.borrow()[0].contains("0.42"));
    }
}
