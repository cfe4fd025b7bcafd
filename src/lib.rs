//! fluttertidy - find unused assets, files and dependencies in Flutter projects
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Manifest** - Read `pubspec.yaml` for declared assets and dependencies
//! 2. **Discovery** - Collect Dart sources and read each one once
//! 3. **Extraction** - Pattern-match literals, aliases, imports and parts
//! 4. **Resolution** - Resolve alias usage and file reachability
//! 5. **Classification** - Partition each domain into used and unused
//! 6. **Reporting** - Output results as terminal text or JSON

pub mod analysis;
pub mod baseline;
pub mod config;
pub mod diagnostics;
pub mod discovery;
pub mod extract;
pub mod graph;
pub mod manifest;
pub mod report;

pub use analysis::{
    AnalysisResult, Analyzer, DependencyReport, Domain, FileReport, Finding, FindingKind,
    UsageReport,
};
pub use baseline::{Baseline, BaselineStats};
pub use config::{Config, ReachabilityMode};
pub use diagnostics::AnalysisWarning;
pub use discovery::{SourceCache, SourceCollector};
pub use extract::{Fact, FactSet, ReferenceExtractor};
pub use graph::{FileGraph, FileReference, ReferenceKind};
pub use manifest::{Manifest, ManifestReader};
pub use report::{ReportFormat, Reporter};
