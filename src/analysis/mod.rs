//! Usage resolution: aliases, reachability and per-domain classification

mod aliases;
mod analyzer;
mod classify;
mod entry_points;
mod reachability;
mod usage;

pub use aliases::{AliasResolution, AliasResolver, ResolvedAlias};
pub use analyzer::{AnalysisResult, Analyzer};
pub use classify::{DependencyReport, FileReport, UsageClassifier};
pub use entry_points::EntryPointDetector;
pub use reachability::ReachabilityResolver;
pub use usage::UsageReport;

use serde::{Deserialize, Serialize};

/// Resource domain an analysis run can cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Assets,
    Files,
    Dependencies,
}

impl Domain {
    pub fn all() -> [Domain; 3] {
        [Domain::Assets, Domain::Files, Domain::Dependencies]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Assets => "assets",
            Domain::Files => "files",
            Domain::Dependencies => "dependencies",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of unused item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnusedAsset,
    UnusedFile,
    UnusedDependency,
    UnusedDevDependency,
}

impl FindingKind {
    /// Stable short code
    pub fn code(&self) -> &'static str {
        match self {
            FindingKind::UnusedAsset => "FT001",
            FindingKind::UnusedFile => "FT002",
            FindingKind::UnusedDependency => "FT003",
            FindingKind::UnusedDevDependency => "FT004",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UnusedAsset => "asset",
            FindingKind::UnusedFile => "file",
            FindingKind::UnusedDependency => "dependency",
            FindingKind::UnusedDevDependency => "dev_dependency",
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            FindingKind::UnusedAsset => Domain::Assets,
            FindingKind::UnusedFile => Domain::Files,
            FindingKind::UnusedDependency | FindingKind::UnusedDevDependency => {
                Domain::Dependencies
            }
        }
    }
}

/// One unused item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Finding {
    pub kind: FindingKind,

    /// Asset path, project-relative file path, or dependency name
    pub item: String,

    pub message: String,
}

impl Finding {
    pub fn new(kind: FindingKind, item: String) -> Self {
        let message = match kind {
            FindingKind::UnusedAsset => format!("Asset '{}' is never referenced", item),
            FindingKind::UnusedFile => format!("File '{}' is never imported", item),
            FindingKind::UnusedDependency => {
                format!("Dependency '{}' is never imported", item)
            }
            FindingKind::UnusedDevDependency => {
                format!("Dev dependency '{}' is never imported", item)
            }
        };

        Self {
            kind,
            item,
            message,
        }
    }
}
