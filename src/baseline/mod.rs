//! Baseline support
//!
//! A baseline records the unused items accepted at some point in time so
//! that later runs report only newly unused ones.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

use crate::analysis::{Finding, FindingKind};

/// Baseline errors
#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("Failed to read baseline file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse baseline: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Baseline version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current baseline format version
const BASELINE_VERSION: u32 = 1;

/// Identity of an unused item that survives across runs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemFingerprint {
    /// Finding kind, e.g. `asset` or `dev_dependency`
    pub kind: FindingKind,
    /// Asset path, project-relative file path, or dependency name
    pub item: String,
}

impl ItemFingerprint {
    pub fn from_finding(finding: &Finding) -> Self {
        Self {
            kind: finding.kind,
            item: finding.item.clone(),
        }
    }

    pub fn matches(&self, finding: &Finding) -> bool {
        self.kind == finding.kind && self.item == finding.item
    }
}

/// A baseline of accepted unused items
#[derive(Debug, Serialize, Deserialize)]
pub struct Baseline {
    /// Baseline format version
    pub version: u32,
    /// When the baseline was created, seconds since the Unix epoch
    pub created_at: String,
    /// Accepted items
    pub items: Vec<ItemFingerprint>,
    /// Total count at baseline time
    pub total_at_baseline: usize,
}

impl Baseline {
    /// Create a new baseline from current findings
    pub fn from_findings(findings: &[Finding]) -> Self {
        let items: Vec<ItemFingerprint> = findings.iter().map(ItemFingerprint::from_finding).collect();

        Self {
            version: BASELINE_VERSION,
            created_at: unix_timestamp(),
            items,
            total_at_baseline: findings.len(),
        }
    }

    /// Load a baseline from a file
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let baseline: Self = serde_json::from_reader(reader)?;

        if baseline.version != BASELINE_VERSION {
            return Err(BaselineError::VersionMismatch {
                expected: BASELINE_VERSION,
                found: baseline.version,
            });
        }

        Ok(baseline)
    }

    /// Save baseline to a file
    pub fn save(&self, path: &Path) -> Result<(), BaselineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Findings not covered by the baseline
    pub fn filter_new(&self, findings: &[Finding]) -> Vec<Finding> {
        let known: HashSet<&ItemFingerprint> = self.items.iter().collect();
        findings
            .iter()
            .filter(|finding| !known.contains(&ItemFingerprint::from_finding(finding)))
            .cloned()
            .collect()
    }

    pub fn is_baselined(&self, finding: &Finding) -> bool {
        self.items.iter().any(|fp| fp.matches(finding))
    }

    /// Get statistics about baseline coverage
    pub fn stats(&self, findings: &[Finding]) -> BaselineStats {
        let baselined = findings.iter().filter(|f| self.is_baselined(f)).count();

        BaselineStats {
            total_in_baseline: self.items.len(),
            total_current: findings.len(),
            baselined_found: baselined,
            new_issues: findings.len() - baselined,
        }
    }
}

/// Statistics about baseline comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineStats {
    /// Total items recorded in baseline
    pub total_in_baseline: usize,
    /// Unused items found by this run
    pub total_current: usize,
    /// Number of current findings that match baseline
    pub baselined_found: usize,
    /// Number of findings not in baseline
    pub new_issues: usize,
}

impl std::fmt::Display for BaselineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} new unused items ({} baselined, {} in baseline file)",
            self.new_issues, self.baselined_found, self.total_in_baseline
        )
    }
}

fn unix_timestamp() -> String {
    use std::time::SystemTime;

    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();

    duration.as_secs().to_string()
}
