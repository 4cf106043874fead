//! Rendering of scan outcomes.

use std::process::ExitCode;

use anyhow::Result;
use clamd::ScanOutcome;
use colored::Colorize;

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Table,
    /// Machine-readable JSON.
    Json,
}

/// Prints `outcome`; infected outcomes map to a failing exit code.
pub fn scan(target: &str, outcome: &ScanOutcome, format: OutputFormat) -> Result<ExitCode> {
    if matches!(format, OutputFormat::Json) {
        let obj = serde_json::json!({
            "target": target,
            "result": outcome,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        match outcome {
            ScanOutcome::Clean => println!("{target}: {}", "OK".green()),
            ScanOutcome::Infected(found) => {
                for (path, viruses) in found {
                    println!("{path}: {} {}", viruses.join(", ").red(), "FOUND".red().bold());
                }
            }
        }
    }

    Ok(if outcome.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
