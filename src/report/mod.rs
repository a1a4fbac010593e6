use colored::Colorize;
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::path::PathBuf;

use crate::analysis::TreeShakeResults;

/// Output format for tree shake reports
#[derive(Debug, Clone, Default)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Reporter for the kept/purged partition
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
        }
    }

    pub fn report(&self, results: &TreeShakeResults) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => self.report_terminal(results),
            ReportFormat::Json => self.report_json(results),
        }
    }

    fn report_terminal(&self, results: &TreeShakeResults) -> Result<()> {
        let purged = results.purged_paths();
        if purged.is_empty() {
            println!("{}", "No unused modules found.".green());
            return Ok(());
        }

        println!();
        println!("{}", "Unused modules:".yellow().bold());
        for path in &purged {
            println!("  {} {}", "○".dimmed(), path);
        }
        println!();
        println!(
            "{}",
            format!(
                "{} purged, {} kept",
                results.purged.len(),
                results.kept.len()
            )
            .dimmed()
        );
        Ok(())
    }

    fn report_json(&self, results: &TreeShakeResults) -> Result<()> {
        let report = json!({
            "purged": results.purged_paths(),
            "kept": results.kept_paths(),
        });
        let output = serde_json::to_string_pretty(&report).into_diagnostic()?;

        match &self.output_path {
            Some(path) => std::fs::write(path, output).into_diagnostic()?,
            None => println!("{output}"),
        }
        Ok(())
    }
}
