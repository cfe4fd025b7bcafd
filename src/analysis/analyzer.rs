use super::{
    AliasResolver, DependencyReport, Domain, EntryPointDetector, FileReport, Finding, FindingKind,
    ReachabilityResolver, UsageClassifier, UsageReport,
};
use crate::config::Config;
use crate::diagnostics::{AnalysisWarning, Diagnostics};
use crate::discovery::{absolute_path, relative_slash_path, CollectOptions, SourceCache, SourceCollector};
use crate::extract::{
    AliasExtractor, DependencyMatcher, LiteralMatcher, ReferenceExtractor, StructuralExtractor,
};
use crate::graph::FileGraph;
use crate::manifest::ManifestReader;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything one analysis run produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub project_root: PathBuf,

    /// `None` when the domain was not requested
    pub assets: Option<UsageReport<String>>,
    pub files: Option<FileReport>,
    pub dependencies: Option<DependencyReport>,

    pub warnings: Vec<AnalysisWarning>,
}

impl AnalysisResult {
    /// Unused items across all domains, flattened
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        if let Some(assets) = &self.assets {
            findings.extend(
                assets
                    .unused
                    .iter()
                    .map(|asset| Finding::new(FindingKind::UnusedAsset, asset.clone())),
            );
        }

        if let Some(dependencies) = &self.dependencies {
            findings.extend(
                dependencies
                    .generic
                    .unused
                    .iter()
                    .map(|name| Finding::new(FindingKind::UnusedDependency, name.clone())),
            );
            findings.extend(
                dependencies
                    .dev
                    .unused
                    .iter()
                    .map(|name| Finding::new(FindingKind::UnusedDevDependency, name.clone())),
            );
        }

        if let Some(files) = &self.files {
            findings.extend(files.usage.unused.iter().map(|file| {
                Finding::new(
                    FindingKind::UnusedFile,
                    relative_slash_path(&self.project_root, file),
                )
            }));
        }

        findings
    }

    pub fn has_unused(&self) -> bool {
        !self.findings().is_empty()
    }

    /// No `pubspec.yaml` was found, so assets and dependencies are empty
    pub fn manifest_missing(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, AnalysisWarning::MissingManifest { .. }))
    }
}

/// Runs the full pipeline over one project
pub struct Analyzer {
    project_root: PathBuf,
    config: Config,
    domains: BTreeSet<Domain>,
}

impl Analyzer {
    pub fn new(project_root: &Path, config: Config) -> Self {
        Self {
            project_root: absolute_path(project_root),
            config,
            domains: Domain::all().into_iter().collect(),
        }
    }

    /// Restrict the run to `domains`; an empty slice keeps all of them
    pub fn with_domains(mut self, domains: &[Domain]) -> Self {
        if !domains.is_empty() {
            self.domains = domains.iter().copied().collect();
        }
        self
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Analyze the project
    ///
    /// Fails only when the project directory itself is missing; every other
    /// problem is recorded as a warning on the result.
    pub fn run(&self) -> Result<AnalysisResult> {
        let root = &self.project_root;
        if !root.is_dir() {
            return Err(miette!("Project directory not found: {}", root.display()));
        }

        let wants = |domain| self.domains.contains(&domain);
        let mut diagnostics = Diagnostics::new();

        let reader = ManifestReader::new(&self.config.sdk_packages);
        let manifest = reader.read(root, &mut diagnostics);

        let lib_files = if wants(Domain::Assets) || wants(Domain::Files) {
            SourceCollector::new(CollectOptions::dart(&self.config.exclude_dirs))
                .collect(&root.join("lib"))
        } else {
            Vec::new()
        };
        let dependency_files = if wants(Domain::Dependencies) {
            self.dependency_corpus(root)
        } else {
            Vec::new()
        };

        let mut all_files: Vec<PathBuf> = lib_files.iter().chain(&dependency_files).cloned().collect();
        all_files.sort();
        all_files.dedup();

        let (cache, read_warnings) = SourceCache::load(&all_files);
        diagnostics.extend(read_warnings);
        if cache.is_empty() {
            info!("No Dart sources found under {}", root.display());
        } else {
            info!("Loaded {} source files", cache.len());
        }

        let declared_assets = if wants(Domain::Assets) {
            reader.expand_assets(root, &manifest, &mut diagnostics)
        } else {
            Vec::new()
        };

        // One scan of lib/ feeds both the asset and file domains
        let mut extractor = ReferenceExtractor::new();
        if wants(Domain::Assets) {
            extractor = extractor
                .with_literals(LiteralMatcher::new(&declared_assets))
                .with_aliases(AliasExtractor::new(&declared_assets).into_diagnostic()?);
        }
        if wants(Domain::Files) {
            let package_name = self
                .config
                .package_name
                .clone()
                .unwrap_or_else(|| StructuralExtractor::default_package_name(root));
            extractor = extractor
                .with_structural(StructuralExtractor::new(root, &package_name).into_diagnostic()?);
        }
        let lib_facts = extractor.scan(&cache, &lib_files);

        let classifier = UsageClassifier::new(&self.config, root);

        let assets = if wants(Domain::Assets) {
            let resolution =
                AliasResolver::new().resolve(&lib_facts.aliases, &cache.sources(&lib_files));
            diagnostics.extend(resolution.warnings.iter().cloned());
            Some(classifier.assets(&declared_assets, &lib_facts, &resolution))
        } else {
            None
        };

        let files = if wants(Domain::Files) {
            let graph = FileGraph::from_references(&lib_facts.references);
            debug!(
                "File graph: {} files, {} references",
                graph.file_count(),
                graph.reference_count()
            );
            let entry_points =
                EntryPointDetector::new(root, &self.config.entry_points).detect(&lib_files);
            let universe: BTreeSet<PathBuf> = lib_files.iter().cloned().collect();
            let closure = ReachabilityResolver::new(self.config.reachability).closure(
                &graph,
                &lib_facts.references,
                &entry_points,
                &universe,
            );
            Some(classifier.files(&lib_files, closure, entry_points, &graph))
        } else {
            None
        };

        let dependencies = if wants(Domain::Dependencies) {
            let (generic, dev) = reader.declared_dependencies(&manifest);
            let names: Vec<String> = generic.iter().chain(&dev).cloned().collect();
            let matcher = DependencyMatcher::new(&names).into_diagnostic()?;
            let facts = ReferenceExtractor::new()
                .with_dependencies(matcher)
                .scan(&cache, &dependency_files);
            Some(classifier.dependencies(&generic, &dev, &facts))
        } else {
            None
        };

        if !diagnostics.is_empty() {
            debug!("{} warnings recorded", diagnostics.warnings().len());
        }

        let result = AnalysisResult {
            project_root: root.clone(),
            assets,
            files,
            dependencies,
            warnings: diagnostics.into_vec(),
        };

        info!(
            "Analysis complete: {} unused items, {} warnings",
            result.findings().len(),
            result.warnings.len()
        );

        Ok(result)
    }

    /// Dart files that may import dependencies: `lib/`, `test/`,
    /// `integration_test/` and stray files elsewhere in the project
    fn dependency_corpus(&self, root: &Path) -> Vec<PathBuf> {
        let collector = SourceCollector::new(CollectOptions::dart(&self.config.exclude_dirs));
        let mut files = collector.collect_all(&[
            root.join("lib"),
            root.join("test"),
            root.join("integration_test"),
        ]);

        // The root scan honours both exclusion lists
        let root_excludes: Vec<String> = self
            .config
            .root_exclude_dirs
            .iter()
            .chain(&self.config.exclude_dirs)
            .cloned()
            .collect();
        let stray = SourceCollector::new(CollectOptions::dart(&root_excludes)).collect(root);
        files.extend(stray);

        files.sort();
        files.dedup();
        files
    }
}
