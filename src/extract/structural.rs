use crate::discovery::{normalize_path, SourceFile};
use crate::graph::{FileReference, ReferenceKind};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::trace;

const BUILTIN_SCHEME: &str = "dart:";
const PACKAGE_SCHEME: &str = "package:";

/// Extracts import/export/part/part-of/library references from Dart source
#[derive(Debug, Clone)]
pub struct StructuralExtractor {
    /// Directory `package:<own-package>/` URIs resolve into
    lib_dir: PathBuf,

    /// The project's own package name
    package_name: String,

    import_pattern: Regex,
    export_pattern: Regex,
    part_pattern: Regex,
    part_of_pattern: Regex,
    library_pattern: Regex,
}

impl StructuralExtractor {
    pub fn new(project_root: &Path, package_name: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            lib_dir: project_root.join("lib"),
            package_name: package_name.to_string(),
            // Trailing `as`/`show`/`hide`/`deferred` clauses are allowed
            import_pattern: Regex::new(r#"\bimport\s+['"]([^'"]+)['"][^;]*;"#)?,
            export_pattern: Regex::new(r#"\bexport\s+['"]([^'"]+)['"][^;]*;"#)?,
            part_pattern: Regex::new(r#"\bpart\s+['"]([^'"]+)['"]\s*;"#)?,
            part_of_pattern: Regex::new(r#"\bpart\s+of\s+['"]([^'"]+)['"]\s*;"#)?,
            library_pattern: Regex::new(r"(?m)^\s*library\s+([\w.]+)\s*;")?,
        })
    }

    /// Package name a project directory maps to: its base name with `-` folded to `_`
    pub fn default_package_name(project_root: &Path) -> String {
        project_root
            .file_name()
            .map(|name| name.to_string_lossy().replace('-', "_"))
            .unwrap_or_default()
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// All references in one file whose targets exist on disk
    pub fn extract(&self, file: SourceFile<'_>) -> Vec<FileReference> {
        let mut references = Vec::new();

        let families = [
            (&self.import_pattern, ReferenceKind::Import),
            (&self.export_pattern, ReferenceKind::Export),
            (&self.part_pattern, ReferenceKind::Part),
            (&self.part_of_pattern, ReferenceKind::PartOf),
        ];

        for (pattern, kind) in families {
            for captures in pattern.captures_iter(file.contents) {
                let Some(uri) = captures.get(1) else {
                    continue;
                };

                match self.resolve(file.path, uri.as_str()) {
                    Some(target) => {
                        references.push(FileReference::new(kind, file.path.to_path_buf(), target))
                    }
                    None => trace!(
                        "Dropped {} '{}' in {}",
                        kind.display_name(),
                        uri.as_str(),
                        file.path.display()
                    ),
                }
            }
        }

        if self.library_pattern.is_match(file.contents) {
            references.push(FileReference::library(file.path.to_path_buf()));
        }

        references
    }

    /// Resolve a URI to an existing file
    ///
    /// `dart:` URIs and other packages resolve to nothing. The project's own
    /// `package:` URIs map into `lib/`; anything else is relative to the
    /// referencing file.
    pub fn resolve(&self, source: &Path, uri: &str) -> Option<PathBuf> {
        if uri.starts_with(BUILTIN_SCHEME) {
            return None;
        }

        let candidate = if let Some(rest) = uri.strip_prefix(PACKAGE_SCHEME) {
            let (package, path) = rest.split_once('/')?;
            if package != self.package_name {
                return None;
            }
            self.lib_dir.join(path)
        } else {
            source.parent()?.join(uri)
        };

        let candidate = normalize_path(&candidate);
        candidate.is_file().then_some(candidate)
    }
}
