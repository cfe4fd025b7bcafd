//! Fact extraction from raw Dart source text
//!
//! Each pattern family runs independently over a file and produces typed
//! facts. Matching is lexical: comments and strings are not distinguished
//! from code.

mod alias;
mod dependency;
mod literal;
mod structural;

pub use alias::{definition_pattern, AliasDeclaration, AliasExtractor};
pub use dependency::{DependencyMatcher, DependencyPattern};
pub use literal::LiteralMatcher;
pub use structural::StructuralExtractor;

use crate::discovery::{SourceCache, SourceFile};
use crate::graph::FileReference;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One observation about one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// The file contains a candidate literal verbatim
    LiteralHit { file: PathBuf, literal: String },

    /// The file declares an alias
    AliasDeclared(AliasDeclaration),

    /// The file references another file
    Reference(FileReference),

    /// The file imports a declared dependency
    DependencyImport { file: PathBuf, dependency: String },
}

/// All facts from one scan, grouped by family
#[derive(Debug, Default)]
pub struct FactSet {
    /// Literal -> files containing it, in file order
    pub literal_hits: BTreeMap<String, Vec<PathBuf>>,

    /// Alias declarations in file order, duplicates included
    pub aliases: Vec<AliasDeclaration>,

    pub references: Vec<FileReference>,

    /// Dependency name -> files importing it, in file order
    pub dependency_hits: BTreeMap<String, Vec<PathBuf>>,
}

impl FactSet {
    pub fn push(&mut self, fact: Fact) {
        match fact {
            Fact::LiteralHit { file, literal } => {
                self.literal_hits.entry(literal).or_default().push(file)
            }
            Fact::AliasDeclared(declaration) => self.aliases.push(declaration),
            Fact::Reference(reference) => self.references.push(reference),
            Fact::DependencyImport { file, dependency } => {
                self.dependency_hits.entry(dependency).or_default().push(file)
            }
        }
    }

    /// Files containing `literal`
    pub fn files_containing(&self, literal: &str) -> &[PathBuf] {
        self.literal_hits
            .get(literal)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Files importing `dependency`
    pub fn files_importing(&self, dependency: &str) -> &[PathBuf] {
        self.dependency_hits
            .get(dependency)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Runs the configured pattern families over source files
#[derive(Debug, Default)]
pub struct ReferenceExtractor {
    literals: Option<LiteralMatcher>,
    aliases: Option<AliasExtractor>,
    structural: Option<StructuralExtractor>,
    dependencies: Option<DependencyMatcher>,
}

impl ReferenceExtractor {
    /// An extractor with no families enabled
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_literals(mut self, matcher: LiteralMatcher) -> Self {
        self.literals = Some(matcher);
        self
    }

    pub fn with_aliases(mut self, extractor: AliasExtractor) -> Self {
        self.aliases = Some(extractor);
        self
    }

    pub fn with_structural(mut self, extractor: StructuralExtractor) -> Self {
        self.structural = Some(extractor);
        self
    }

    pub fn with_dependencies(mut self, matcher: DependencyMatcher) -> Self {
        self.dependencies = Some(matcher);
        self
    }

    /// Facts for a single file
    pub fn extract(&self, file: SourceFile<'_>) -> Vec<Fact> {
        let mut facts = Vec::new();
        let path = || file.path.to_path_buf();

        if let Some(literals) = &self.literals {
            facts.extend(literals.find(file.contents).into_iter().map(|literal| {
                Fact::LiteralHit {
                    file: path(),
                    literal: literal.to_string(),
                }
            }));
        }

        if let Some(aliases) = &self.aliases {
            facts.extend(aliases.extract(file).into_iter().map(Fact::AliasDeclared));
        }

        if let Some(structural) = &self.structural {
            facts.extend(structural.extract(file).into_iter().map(Fact::Reference));
        }

        if let Some(dependencies) = &self.dependencies {
            facts.extend(dependencies.find(file.contents).into_iter().map(|name| {
                Fact::DependencyImport {
                    file: path(),
                    dependency: name.to_string(),
                }
            }));
        }

        facts
    }

    /// Scan every loaded file among `files` exactly once
    ///
    /// Files are processed in parallel; the per-file results are merged in
    /// the order of `files`.
    pub fn scan(&self, cache: &SourceCache, files: &[PathBuf]) -> FactSet {
        let sources = cache.sources(files);

        let per_file: Vec<Vec<Fact>> = sources
            .par_iter()
            .map(|source| self.extract(*source))
            .collect();

        let mut facts = FactSet::default();
        for fact in per_file.into_iter().flatten() {
            facts.push(fact);
        }

        debug!(
            "Scanned {} files: {} literal hits, {} aliases, {} references, {} dependency imports",
            sources.len(),
            facts.literal_hits.values().map(Vec::len).sum::<usize>(),
            facts.aliases.len(),
            facts.references.len(),
            facts.dependency_hits.values().map(Vec::len).sum::<usize>()
        );

        facts
    }

    /// Convenience for callers holding a single in-memory file
    pub fn extract_text(&self, path: &Path, contents: &str) -> Vec<Fact> {
        self.extract(SourceFile { path, contents })
    }
}
