//! Shared output helpers for command reports

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// Output format selected on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            Format::Json
        } else {
            Format::Text
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Json => "json",
        }
    }
}

/// Timestamped results file name, e.g. `tournament_results_20240101_120000.txt`
pub fn default_results_path(prefix: &str, format: Format, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "{}_results_{}.{}",
        prefix,
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

/// Human-readable timestamp used in report headers
pub fn display_time(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Print a rendered report and optionally save it to `output`
pub fn emit(report: &str, output: Option<&Path>) -> Result<()> {
    println!("{}", report);

    if let Some(path) = output {
        fs::write(path, report)
            .with_context(|| format!("Failed to write results: {}", path.display()))?;
        tracing::info!("Results saved to {}", path.display());
    }

    Ok(())
}
