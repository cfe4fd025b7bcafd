use crate::analysis::{AnalysisResult, Finding, UsageReport};
use crate::baseline::BaselineStats;
use crate::diagnostics::AnalysisWarning;
use crate::discovery::relative_slash_path;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(
        &self,
        result: &AnalysisResult,
        findings: &[Finding],
        baseline: Option<&BaselineStats>,
    ) -> Result<()> {
        let json = self.render(result, findings, baseline)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            eprintln!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    /// Render the report document as pretty JSON
    pub fn render(
        &self,
        result: &AnalysisResult,
        findings: &[Finding],
        baseline: Option<&BaselineStats>,
    ) -> Result<String> {
        let report = JsonReport::new(result, findings, baseline);
        serde_json::to_string_pretty(&report).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    project_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    assets: Option<&'a UsageReport<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<JsonFileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependencies: Option<JsonDependencies<'a>>,
    total_unused: usize,
    findings: Vec<JsonFinding<'a>>,
    warnings: Vec<JsonWarning<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    baseline: Option<&'a BaselineStats>,
}

#[derive(Serialize)]
struct JsonDependencies<'a> {
    generic: &'a UsageReport<String>,
    dev: &'a UsageReport<String>,
}

/// File report with paths relative to the project root
#[derive(Serialize)]
struct JsonFileReport {
    declared: Vec<String>,
    used: BTreeSet<String>,
    unused: Vec<String>,
    references: BTreeMap<String, Vec<String>>,
    closure: BTreeSet<String>,
    entry_points: Vec<String>,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    code: &'static str,
    kind: &'static str,
    item: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonWarning<'a> {
    message: String,
    #[serde(flatten)]
    detail: &'a AnalysisWarning,
}

impl<'a> JsonReport<'a> {
    fn new(
        result: &'a AnalysisResult,
        findings: &'a [Finding],
        baseline: Option<&'a BaselineStats>,
    ) -> Self {
        let root = result.project_root.as_path();
        let relative = |path: &PathBuf| relative_slash_path(root, path);

        let files = result.files.as_ref().map(|files| JsonFileReport {
            declared: files.usage.declared.iter().map(|p| relative(p)).collect(),
            used: files.usage.used.iter().map(|p| relative(p)).collect(),
            unused: files.usage.unused.iter().map(|p| relative(p)).collect(),
            references: files
                .usage
                .references
                .iter()
                .map(|(file, referrers)| {
                    (relative(file), referrers.iter().map(|p| relative(p)).collect())
                })
                .collect(),
            closure: files.closure.iter().map(|p| relative(p)).collect(),
            entry_points: files.entry_points.iter().map(|p| relative(p)).collect(),
        });

        Self {
            version: "1.0",
            project_root: root.display().to_string(),
            assets: result.assets.as_ref(),
            files,
            dependencies: result.dependencies.as_ref().map(|deps| JsonDependencies {
                generic: &deps.generic,
                dev: &deps.dev,
            }),
            total_unused: findings.len(),
            findings: findings
                .iter()
                .map(|finding| JsonFinding {
                    code: finding.kind.code(),
                    kind: finding.kind.as_str(),
                    item: &finding.item,
                    message: &finding.message,
                })
                .collect(),
            warnings: result
                .warnings
                .iter()
                .map(|warning| JsonWarning {
                    message: warning.to_string(),
                    detail: warning,
                })
                .collect(),
            baseline,
        }
    }
}
