mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::{AnalysisResult, Finding};
use crate::baseline::BaselineStats;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

impl ReportFormat {
    /// Parse a config value; unknown names fall back to terminal
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => ReportFormat::Json,
            _ => ReportFormat::Terminal,
        }
    }
}

/// Reporter for analysis results
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
    show_references: bool,
    baseline_stats: Option<BaselineStats>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self {
            format,
            output_path,
            show_references: false,
            baseline_stats: None,
        }
    }

    pub fn with_references(mut self, show: bool) -> Self {
        self.show_references = show;
        self
    }

    pub fn with_baseline_stats(mut self, stats: Option<BaselineStats>) -> Self {
        self.baseline_stats = stats;
        self
    }

    /// Report `findings`, which may be a baseline-filtered subset of the result's
    pub fn report(&self, result: &AnalysisResult, findings: &[Finding]) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new()
                .with_references(self.show_references)
                .report(result, findings, self.baseline_stats.as_ref()),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone())
                .report(result, findings, self.baseline_stats.as_ref()),
        }
    }
}
