//! Non-fatal analysis warnings
//!
//! None of these abort a run. They are logged as they happen and handed back
//! with the analysis result so callers can surface them.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// A recoverable problem encountered during analysis
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisWarning {
    /// No manifest in the project root; all universes are empty
    #[error("pubspec.yaml not found at {}", .path.display())]
    MissingManifest { path: PathBuf },

    /// The manifest exists but is not valid YAML
    #[error("pubspec.yaml at {} could not be parsed: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    /// A declared asset entry does not exist on disk
    #[error("asset path does not exist: {asset} ({})", .path.display())]
    MissingAssetPath { asset: String, path: PathBuf },

    /// A source file could not be read; its facts are empty
    #[error("could not read {}: {message}", .path.display())]
    FileReadFailure { path: PathBuf, message: String },

    /// An alias whose declaration could not be located in any file
    #[error("no defining file found for alias {key}")]
    UnresolvedAlias { key: String },

    /// The same scope and alias name declared more than once
    #[error(
        "alias {key} declared in {} and again in {}; keeping the first",
        .first.display(),
        .duplicate.display()
    )]
    DuplicateAlias {
        key: String,
        first: PathBuf,
        duplicate: PathBuf,
    },
}

/// Collector for warnings raised during one analysis run
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<AnalysisWarning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it
    pub fn push(&mut self, warning: AnalysisWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, warnings: impl IntoIterator<Item = AnalysisWarning>) {
        for warning in warnings {
            self.push(warning);
        }
    }

    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_vec(self) -> Vec<AnalysisWarning> {
        self.warnings
    }
}
