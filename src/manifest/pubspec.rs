use crate::diagnostics::{AnalysisWarning, Diagnostics};
use crate::discovery::{normalize_path, relative_slash_path};
use serde_yaml::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File name of the project manifest
pub const MANIFEST_FILE: &str = "pubspec.yaml";

/// Manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// The parts of `pubspec.yaml` the analysis consumes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// Package name from the `name:` key
    pub name: Option<String>,

    /// `flutter.assets` entries exactly as declared (files or directories)
    pub assets: Vec<String>,

    /// `dependencies` keys, in declaration order
    pub dependencies: Vec<String>,

    /// `dev_dependencies` keys, in declaration order
    pub dev_dependencies: Vec<String>,
}

/// Reads the manifest and derives the declared universes from it
pub struct ManifestReader {
    /// SDK pseudo-dependencies that are never classified
    sdk_packages: Vec<String>,
}

impl ManifestReader {
    pub fn new(sdk_packages: &[String]) -> Self {
        Self {
            sdk_packages: sdk_packages.to_vec(),
        }
    }

    /// Parse manifest text
    ///
    /// Keys of the wrong shape are ignored rather than rejected; only
    /// malformed YAML is an error.
    pub fn parse(&self, contents: &str) -> Result<Manifest, ManifestError> {
        let doc: Value = serde_yaml::from_str(contents)?;

        let name = doc.get("name").and_then(Value::as_str).map(str::to_string);

        let assets = doc
            .get("flutter")
            .and_then(|f| f.get("assets"))
            .and_then(Value::as_sequence)
            .map(|entries| entries.iter().filter_map(asset_entry_path).collect())
            .unwrap_or_default();

        Ok(Manifest {
            name,
            assets,
            dependencies: self.dependency_names(doc.get("dependencies")),
            dev_dependencies: self.dependency_names(doc.get("dev_dependencies")),
        })
    }

    /// Read `pubspec.yaml` from the project root
    ///
    /// A missing or unparsable manifest yields an empty manifest plus a warning.
    pub fn read(&self, project_root: &Path, diagnostics: &mut Diagnostics) -> Manifest {
        let path = project_root.join(MANIFEST_FILE);

        if !path.is_file() {
            diagnostics.push(AnalysisWarning::MissingManifest { path });
            return Manifest::default();
        }

        let result = fs::read_to_string(&path)
            .map_err(ManifestError::from)
            .and_then(|contents| self.parse(&contents));

        match result {
            Ok(manifest) => {
                debug!(
                    "Manifest: {} asset entries, {} dependencies, {} dev dependencies",
                    manifest.assets.len(),
                    manifest.dependencies.len(),
                    manifest.dev_dependencies.len()
                );
                manifest
            }
            Err(ManifestError::ParseError(err)) => {
                diagnostics.push(AnalysisWarning::InvalidManifest {
                    path,
                    message: err.to_string(),
                });
                Manifest::default()
            }
            Err(ManifestError::ReadError(err)) => {
                diagnostics.push(AnalysisWarning::FileReadFailure {
                    path,
                    message: err.to_string(),
                });
                Manifest::default()
            }
        }
    }

    /// Expand asset entries into project-relative file paths
    ///
    /// Directory entries contribute every file beneath them. Entries that do
    /// not exist are skipped with a warning. Duplicates keep their first
    /// position.
    pub fn expand_assets(
        &self,
        project_root: &Path,
        manifest: &Manifest,
        diagnostics: &mut Diagnostics,
    ) -> Vec<String> {
        let mut assets = Vec::new();

        for entry in &manifest.assets {
            let full_path = normalize_path(&project_root.join(entry));

            if !full_path.exists() {
                diagnostics.push(AnalysisWarning::MissingAssetPath {
                    asset: entry.clone(),
                    path: full_path,
                });
                continue;
            }

            if full_path.is_dir() {
                let walker = WalkDir::new(&full_path)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_entry(|e| {
                        e.depth() == 0
                            || !(e.file_type().is_dir()
                                && e.file_name().to_string_lossy().starts_with('.'))
                    });

                for item in walker {
                    match item {
                        Ok(item) if item.file_type().is_file() => {
                            assets.push(relative_slash_path(project_root, item.path()));
                        }
                        Ok(_) => {}
                        Err(err) => warn!("Skipping asset entry under {}: {}", entry, err),
                    }
                }
            } else {
                assets.push(relative_slash_path(project_root, &full_path));
            }
        }

        let mut seen = HashSet::new();
        assets.retain(|asset| seen.insert(asset.clone()));
        assets
    }

    /// Ordinary and development dependency names with SDK packages removed
    pub fn declared_dependencies(&self, manifest: &Manifest) -> (Vec<String>, Vec<String>) {
        (
            self.without_sdk_packages(&manifest.dependencies),
            self.without_sdk_packages(&manifest.dev_dependencies),
        )
    }

    fn without_sdk_packages(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| !self.sdk_packages.contains(name))
            .cloned()
            .collect()
    }

    fn dependency_names(&self, section: Option<&Value>) -> Vec<String> {
        let Some(mapping) = section.and_then(Value::as_mapping) else {
            return Vec::new();
        };

        mapping
            .keys()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// An asset entry is either a plain path or a map with a `path` key
fn asset_entry_path(entry: &Value) -> Option<String> {
    match entry {
        Value::String(path) => Some(path.clone()),
        Value::Mapping(_) => entry.get("path").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}
