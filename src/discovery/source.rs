use crate::diagnostics::AnalysisWarning;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A source file read during this run
#[derive(Debug, Clone, Copy)]
pub struct SourceFile<'a> {
    /// Absolute path to the file
    pub path: &'a Path,

    /// Full text of the file
    pub contents: &'a str,
}

/// Contents of every source file needed by one analysis run
///
/// Each file is read exactly once when the cache is built and never again,
/// so all resolvers see the same text even if the tree changes mid-run.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: BTreeMap<PathBuf, String>,
}

impl SourceCache {
    /// Read all files in parallel; unreadable files become warnings
    ///
    /// Invalid UTF-8 is decoded lossily so one stray byte never hides a
    /// file's references.
    pub fn load(paths: &[PathBuf]) -> (Self, Vec<AnalysisWarning>) {
        let results: Vec<(PathBuf, std::io::Result<String>)> = paths
            .par_iter()
            .map(|path| (path.clone(), read_lossy(path)))
            .collect();

        let mut files = BTreeMap::new();
        let mut warnings = Vec::new();

        for (path, result) in results {
            match result {
                Ok(contents) => {
                    files.insert(path, contents);
                }
                Err(err) => warnings.push(AnalysisWarning::FileReadFailure {
                    path,
                    message: err.to_string(),
                }),
            }
        }

        debug!("Loaded {} source files ({} unreadable)", files.len(), warnings.len());
        (Self { files }, warnings)
    }

    /// Build a cache from in-memory contents
    pub fn from_sources<P, S>(sources: impl IntoIterator<Item = (P, S)>) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self {
            files: sources
                .into_iter()
                .map(|(p, s)| (p.into(), s.into()))
                .collect(),
        }
    }

    /// Contents of a file, `None` when it was never loaded or could not be read
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Loaded files among `paths`, in the order given
    pub fn sources<'a>(&'a self, paths: &'a [PathBuf]) -> Vec<SourceFile<'a>> {
        paths
            .iter()
            .filter_map(|path| {
                self.get(path).map(|contents| SourceFile {
                    path: path.as_path(),
                    contents,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
