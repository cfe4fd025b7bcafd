use crate::analysis::{AnalysisResult, Finding, FindingKind, UsageReport};
use crate::baseline::BaselineStats;
use crate::discovery::relative_slash_path;
use colored::Colorize;
use miette::Result;
use std::path::Path;

/// Terminal reporter with colored output
pub struct TerminalReporter {
    /// List the files referencing each used item
    show_references: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            show_references: false,
        }
    }

    pub fn with_references(mut self, show: bool) -> Self {
        self.show_references = show;
        self
    }

    pub fn report(
        &self,
        result: &AnalysisResult,
        findings: &[Finding],
        baseline: Option<&BaselineStats>,
    ) -> Result<()> {
        let root = result.project_root.as_path();

        if result.manifest_missing() {
            println!(
                "{}",
                format!("No pubspec.yaml found in {}", root.display())
                    .yellow()
                    .bold()
            );
            println!();
        }

        if let Some(assets) = &result.assets {
            self.print_section("Assets", findings, FindingKind::UnusedAsset);
            if self.show_references {
                self.print_references(assets, |item| item.clone(), root);
            }
        }

        if let Some(dependencies) = &result.dependencies {
            self.print_section("Dependencies", findings, FindingKind::UnusedDependency);
            if self.show_references {
                self.print_references(&dependencies.generic, |item| item.clone(), root);
            }
            self.print_section("Dev dependencies", findings, FindingKind::UnusedDevDependency);
            if self.show_references {
                self.print_references(&dependencies.dev, |item| item.clone(), root);
            }
        }

        if let Some(files) = &result.files {
            self.print_section("Files", findings, FindingKind::UnusedFile);
            if self.show_references {
                self.print_references(&files.usage, |item| relative_slash_path(root, item), root);
            }
        }

        if !result.warnings.is_empty() {
            println!("{}", "Warnings:".yellow().bold());
            for warning in &result.warnings {
                println!("  {} {}", "⚠".yellow(), warning);
            }
            println!();
        }

        self.print_summary(result, findings, baseline);
        Ok(())
    }

    fn print_section(&self, title: &str, findings: &[Finding], kind: FindingKind) {
        let items: Vec<&Finding> = findings.iter().filter(|f| f.kind == kind).collect();

        if items.is_empty() {
            println!("{} {}", title.cyan().bold(), "no unused items".green());
            println!();
            return;
        }

        println!(
            "{}",
            format!("{} ({} unused)", title, items.len()).cyan().bold()
        );
        for finding in items {
            println!(
                "  {} [{}] {}",
                "✗".red(),
                finding.kind.code().dimmed(),
                finding.item.white()
            );
        }
        println!();
    }

    fn print_references<T: Ord>(
        &self,
        report: &UsageReport<T>,
        label: impl Fn(&T) -> String,
        root: &Path,
    ) {
        for (item, files) in &report.references {
            println!("  {} {}", "✓".green(), label(item));
            for file in files {
                println!(
                    "      {} {}",
                    "←".dimmed(),
                    relative_slash_path(root, file).dimmed()
                );
            }
        }
        if !report.references.is_empty() {
            println!();
        }
    }

    fn print_summary(
        &self,
        result: &AnalysisResult,
        findings: &[Finding],
        baseline: Option<&BaselineStats>,
    ) {
        println!("{}", "─".repeat(60).dimmed());

        let mut parts = Vec::new();
        if let Some(assets) = &result.assets {
            parts.push(summary_part("assets", assets));
        }
        if let Some(dependencies) = &result.dependencies {
            parts.push(summary_part("dependencies", &dependencies.generic));
            parts.push(summary_part("dev dependencies", &dependencies.dev));
        }
        if let Some(files) = &result.files {
            parts.push(summary_part("files", &files.usage));
        }
        println!("Summary: {}", parts.join(", "));

        if let Some(stats) = baseline {
            println!(
                "{}",
                format!(
                    "Baseline: {} new, {} baselined ({} total)",
                    stats.new_issues, stats.baselined_found, stats.total_current
                )
                .dimmed()
            );
        }

        println!();
        if findings.is_empty() {
            println!("{}", "No unused items found!".green().bold());
        } else {
            println!(
                "{}",
                format!("Found {} unused items", findings.len()).yellow().bold()
            );
            println!(
                "{}",
                "Tip: Use --show-references to see why items count as used".dimmed()
            );
        }
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn summary_part<T: Ord>(label: &str, report: &UsageReport<T>) -> String {
    let text = format!("{}/{} {} unused", report.unused.len(), report.declared.len(), label);
    if report.unused.is_empty() {
        text.green().to_string()
    } else {
        text.yellow().to_string()
    }
}
