use super::normalize_path;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Filters applied while walking a directory tree
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// File extension to keep, without the dot; `None` keeps every file
    pub extension: Option<String>,

    /// Entry names never collected or descended into
    pub exclude_dirs: Vec<String>,
}

impl CollectOptions {
    /// Dart sources, skipping the given directory names
    pub fn dart(exclude_dirs: &[String]) -> Self {
        Self {
            extension: Some("dart".to_string()),
            exclude_dirs: exclude_dirs.to_vec(),
        }
    }

    /// Every file regardless of extension
    pub fn all_files() -> Self {
        Self::default()
    }

    fn matches_extension(&self, path: &Path) -> bool {
        match &self.extension {
            Some(ext) => path.extension().and_then(|e| e.to_str()) == Some(ext.as_str()),
            None => true,
        }
    }
}

/// Recursive file enumerator for one root directory
pub struct SourceCollector {
    options: CollectOptions,
}

impl SourceCollector {
    pub fn new(options: CollectOptions) -> Self {
        Self { options }
    }

    /// Collect absolute file paths under `root`, sorted
    ///
    /// A missing root yields an empty list. Hidden directories are never
    /// entered; hidden files are kept.
    pub fn collect(&self, root: &Path) -> Vec<PathBuf> {
        if !root.is_dir() {
            trace!("Directory does not exist: {}", root.display());
            return Vec::new();
        }

        let excluded = self.options.exclude_dirs.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if excluded.iter().any(|d| d.as_str() == name.as_ref()) {
                    return false;
                }
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                !(is_dir && name.starts_with('.'))
            })
            .build();

        let mut files = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                    continue;
                }
            };

            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            if !is_file || !self.options.matches_extension(entry.path()) {
                continue;
            }

            trace!("Found: {}", entry.path().display());
            files.push(normalize_path(entry.path()));
        }

        files.sort();
        debug!("Collected {} files under {}", files.len(), root.display());
        files
    }

    /// Collect from several roots and concatenate, dropping duplicates
    pub fn collect_all(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut seen = std::collections::HashSet::new();
        roots
            .iter()
            .flat_map(|root| self.collect(root))
            .filter(|path| seen.insert(path.clone()))
            .collect()
    }
}
