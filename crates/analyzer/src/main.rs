//! Vibration Analyzer - Command Line Entry Point

use analyzer::{init_logging, AnalyzerConfig, BatchAnalyzer};
use clap::Parser;
use instruction_model::{build_batch, InstructionOverride, InstructionSemantics};
use std::path::PathBuf;
use tracing::info;

/// Run analysis instructions against a vibration recording and print the
/// per-axis feature records as JSON.
#[derive(Debug, Parser)]
#[command(name = "vibration-analyzer", version)]
struct Cli {
    /// CSV recording, one column per axis
    #[arg(long)]
    data: PathBuf,

    /// JSON instruction object or array; the configured default when omitted
    #[arg(long)]
    instructions: Option<PathBuf>,

    /// Sample rate (Hz), overrides configuration
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Blade count, overrides configuration
    #[arg(long)]
    blade_count: Option<u32>,

    /// Configuration file (toml, json, yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Merge each instruction over the configured default instruction
    #[arg(long)]
    merge_default: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = AnalyzerConfig::load(cli.config.as_deref())?;
    if let Some(fs) = cli.sample_rate {
        config.sample_rate_hz = fs;
    }
    if let Some(blades) = cli.blade_count {
        config.blade_count = blades;
    }
    config.validate()?;
    init_logging(&config.log_level);

    info!("=== Vibration Analyzer v{} ===", env!("CARGO_PKG_VERSION"));

    let mut instructions = match &cli.instructions {
        Some(path) => {
            let doc = std::fs::read_to_string(path)?;
            build_batch(&InstructionSemantics::list_from_json(&doc)?)
        }
        None => vec![config.default_instruction.clone()],
    };
    if cli.merge_default {
        instructions = instructions
            .into_iter()
            .map(|instr| config.default_instruction.merge(&InstructionOverride::from(instr)))
            .collect();
    }

    let analyzer = BatchAnalyzer::from_config(&config);
    let outcomes = analyzer.analyze_batch(&cli.data, &instructions)?;

    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}
