use anyhow::{Context, Result};
use colored::*;
use linkguard_core::{
    constants::COMPARISON_SAMPLE,
    report::{compare, ComparisonReport},
    BitString, ErrorModel,
};
use std::fs;
use tracing::info;

/// Build the comparison report for `data` (or the built-in sample)
pub fn build_report(data: Option<&str>, seed: Option<u64>) -> Result<ComparisonReport> {
    let data: BitString = data
        .unwrap_or(COMPARISON_SAMPLE)
        .parse()
        .context("Data must be a '0'/'1' string")?;

    let mut rng = crate::make_rng(seed);
    compare(&data, &mut rng).context("Failed to run comparison")
}

pub fn execute(data: Option<&str>, seed: Option<u64>, output: Option<&str>) -> Result<()> {
    let report = build_report(data, seed)?;

    println!("=== ERROR DETECTION COMPARISON ===");
    println!("Original data length: {} bits", report.data.len());

    for section in &report.sections {
        println!("\n--- {} ---", section_title(&section.model));
        for trial in &section.trials {
            let detected = if trial.detected {
                "true".green()
            } else {
                "false".red()
            };
            println!(
                "[{}] Detected={}, Flipped bits={:?}",
                trial.scheme, detected, trial.flipped
            );
        }
    }

    println!("\n=== Summary ===");
    for summary in report.summary() {
        println!(
            "{:<10} detected {}/{} corrupted codewords ({} trials)",
            summary.scheme, summary.detected, summary.corrupted, summary.trials
        );
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)
            .with_context(|| "Failed to serialize comparison report")?;
        fs::write(path, json).with_context(|| format!("Failed to write output file: {}", path))?;
        info!("Comparison report written to: {}", path);
    }

    Ok(())
}

fn section_title(model: &ErrorModel) -> String {
    match model {
        ErrorModel::None => "NO ERRORS".to_string(),
        ErrorModel::Random { count } => format!("RANDOM BIT ERRORS (count = {})", count),
        ErrorModel::Burst { size } => format!("BURST ERRORS (size = {})", size),
        ErrorModel::Odd => "ODD-NUMBER ERRORS".to_string(),
        ErrorModel::Undetectable { shift } => {
            format!("GUARANTEED UNDETECTABLE ERRORS (shift = {})", shift)
        }
    }
}
