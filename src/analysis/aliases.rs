use crate::diagnostics::AnalysisWarning;
use crate::discovery::SourceFile;
use crate::extract::{definition_pattern, AliasDeclaration};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An alias together with the single file that defines it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlias {
    pub declaration: AliasDeclaration,
    pub defining_file: PathBuf,
}

/// Outcome of alias resolution
#[derive(Debug, Default)]
pub struct AliasResolution {
    /// Aliases with a located defining file, by key
    pub resolved: BTreeMap<String, ResolvedAlias>,

    /// Keys referenced from a file other than their defining file
    pub used: BTreeSet<String>,

    /// Keys whose defining file could not be located
    pub unresolved: BTreeSet<String>,

    /// Key -> files using it
    pub usages: BTreeMap<String, Vec<PathBuf>>,

    pub warnings: Vec<AnalysisWarning>,
}

impl AliasResolution {
    /// Resolved aliases bound to `resource`
    pub fn aliases_for<'a>(&'a self, resource: &'a str) -> impl Iterator<Item = &'a ResolvedAlias> {
        self.resolved
            .values()
            .filter(move |alias| alias.declaration.resource == resource)
    }

    pub fn is_used(&self, key: &str) -> bool {
        self.used.contains(key)
    }
}

/// Determines which aliases are referenced outside their own defining file
///
/// Pass 1 locates each alias's defining file; pass 2 searches every file
/// for `Scope.name`. Pass 1 finishes before pass 2 starts.
pub struct AliasResolver;

impl AliasResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        declarations: &[AliasDeclaration],
        sources: &[SourceFile<'_>],
    ) -> AliasResolution {
        let mut resolution = AliasResolution::default();

        let mut sources = sources.to_vec();
        sources.sort_by(|a, b| a.path.cmp(b.path));

        let candidates = self.deduplicate(declarations, &mut resolution.warnings);

        // Pass 1: definitions
        let located: Vec<(String, AliasDeclaration, Option<PathBuf>)> = candidates
            .into_par_iter()
            .map(|(key, declaration)| {
                let defining_file = find_defining_file(&declaration, &sources);
                (key, declaration, defining_file)
            })
            .collect();

        for (key, declaration, defining_file) in located {
            match defining_file {
                Some(defining_file) => {
                    debug!("Alias {} defined in {}", key, defining_file.display());
                    resolution.resolved.insert(
                        key,
                        ResolvedAlias {
                            declaration,
                            defining_file,
                        },
                    );
                }
                None => {
                    resolution
                        .warnings
                        .push(AnalysisWarning::UnresolvedAlias { key: key.clone() });
                    resolution.unresolved.insert(key);
                }
            }
        }

        // Pass 2: usages
        let resolved = &resolution.resolved;
        let hits: Vec<Vec<(String, PathBuf)>> = sources
            .par_iter()
            .map(|source| {
                resolved
                    .iter()
                    .filter(|(key, alias)| {
                        alias.defining_file.as_path() != source.path
                            && source.contents.contains(key.as_str())
                    })
                    .map(|(key, _)| (key.clone(), source.path.to_path_buf()))
                    .collect()
            })
            .collect();

        for (key, file) in hits.into_iter().flatten() {
            resolution.used.insert(key.clone());
            resolution.usages.entry(key).or_default().push(file);
        }

        info!(
            "Aliases: {} resolved, {} used, {} unresolved",
            resolution.resolved.len(),
            resolution.used.len(),
            resolution.unresolved.len()
        );

        resolution
    }

    /// Keep the first declaration per key in file-path order
    fn deduplicate(
        &self,
        declarations: &[AliasDeclaration],
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Vec<(String, AliasDeclaration)> {
        let mut ordered: Vec<&AliasDeclaration> = declarations.iter().collect();
        ordered.sort_by(|a, b| a.file.cmp(&b.file));

        let mut kept: BTreeMap<String, AliasDeclaration> = BTreeMap::new();
        for declaration in ordered {
            let key = declaration.key();
            match kept.get(&key) {
                Some(first) => warnings.push(AnalysisWarning::DuplicateAlias {
                    key,
                    first: first.file.clone(),
                    duplicate: declaration.file.clone(),
                }),
                None => {
                    kept.insert(key, declaration.clone());
                }
            }
        }

        kept.into_iter().collect()
    }
}

impl Default for AliasResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// First file, in sorted order, matching the alias's definition pattern
fn find_defining_file(declaration: &AliasDeclaration, sources: &[SourceFile<'_>]) -> Option<PathBuf> {
    let pattern = definition_pattern(&declaration.scope, &declaration.name).ok()?;
    sources
        .iter()
        .find(|source| pattern.is_match(source.contents))
        .map(|source| source.path.to_path_buf())
}

/// Whether `file` defines any resolved alias bound to `resource` that is unused
pub(crate) fn is_unused_alias_definer(
    resolution: &AliasResolution,
    resource: &str,
    file: &Path,
) -> bool {
    resolution
        .aliases_for(resource)
        .any(|alias| alias.defining_file == file && !resolution.is_used(&alias.declaration.key()))
}
