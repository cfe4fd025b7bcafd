use crate::discovery::normalize_path;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ENTRY_STEM: &str = "main";
const FLAVOR_PREFIX: &str = "main_";

/// Detects program entry files in a Flutter project
///
/// `lib/main.dart` and flavor entries such as `lib/main_staging.dart` are
/// entry points, as is any extra file configured by the user.
pub struct EntryPointDetector {
    lib_dir: PathBuf,
    extra: Vec<PathBuf>,
}

impl EntryPointDetector {
    pub fn new(project_root: &Path, extra: &[PathBuf]) -> Self {
        Self {
            lib_dir: project_root.join("lib"),
            extra: extra
                .iter()
                .map(|path| normalize_path(&project_root.join(path)))
                .collect(),
        }
    }

    /// Entry points among `files`, plus configured extras, in file order
    pub fn detect(&self, files: &[PathBuf]) -> Vec<PathBuf> {
        let mut entry_points: Vec<PathBuf> = files
            .iter()
            .filter(|file| self.is_entry_point(file))
            .cloned()
            .collect();

        for extra in &self.extra {
            if !entry_points.contains(extra) {
                debug!("Configured entry point: {}", extra.display());
                entry_points.push(extra.clone());
            }
        }

        info!("Detected {} entry points", entry_points.len());
        entry_points
    }

    /// Whether `file` follows the entry naming convention at the library root
    pub fn is_entry_point(&self, file: &Path) -> bool {
        if file.parent() != Some(self.lib_dir.as_path()) {
            return false;
        }
        if file.extension().and_then(|e| e.to_str()) != Some("dart") {
            return false;
        }

        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
            return false;
        };

        stem == ENTRY_STEM || (stem.starts_with(FLAVOR_PREFIX) && stem.len() > FLAVOR_PREFIX.len())
    }
}
