use super::aliases::{is_unused_alias_definer, AliasResolution};
use super::UsageReport;
use crate::config::Config;
use crate::discovery::relative_slash_path;
use crate::extract::FactSet;
use crate::graph::FileGraph;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File usage plus the closure it was derived from
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    #[serde(flatten)]
    pub usage: UsageReport<PathBuf>,

    /// Every file considered in use
    pub closure: BTreeSet<PathBuf>,

    pub entry_points: Vec<PathBuf>,
}

/// Dependency usage, split by manifest section
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyReport {
    /// `dependencies`
    pub generic: UsageReport<String>,

    /// `dev_dependencies`
    pub dev: UsageReport<String>,
}

/// Builds the per-domain used/unused partitions
pub struct UsageClassifier<'a> {
    config: &'a Config,
    project_root: &'a Path,
}

impl<'a> UsageClassifier<'a> {
    pub fn new(config: &'a Config, project_root: &'a Path) -> Self {
        Self {
            config,
            project_root,
        }
    }

    /// An asset is used when a used alias is bound to it, or when its literal
    /// appears in a file that is not the definer of an unused alias for it
    pub fn assets(
        &self,
        declared: &[String],
        facts: &FactSet,
        aliases: &AliasResolution,
    ) -> UsageReport<String> {
        let mut references: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        for asset in declared {
            let via_alias = aliases
                .aliases_for(asset)
                .filter(|alias| aliases.is_used(&alias.declaration.key()))
                .flat_map(|alias| {
                    aliases
                        .usages
                        .get(&alias.declaration.key())
                        .cloned()
                        .unwrap_or_default()
                });

            let direct = facts
                .files_containing(asset)
                .iter()
                .filter(|file| !is_unused_alias_definer(aliases, asset, file))
                .cloned();

            let mut files: Vec<PathBuf> = via_alias.chain(direct).collect();
            files.sort();
            files.dedup();

            if !files.is_empty() {
                references.insert(asset.clone(), files);
            }
        }

        let report = UsageReport::classify(declared.iter().cloned(), |asset| {
            references.contains_key(asset) || self.retained(asset)
        });

        debug!(
            "Assets: {} declared, {} unused",
            report.declared.len(),
            report.unused.len()
        );
        report.with_references(references)
    }

    /// A file is used when it is in the reachability closure
    pub fn files(
        &self,
        files: &[PathBuf],
        closure: BTreeSet<PathBuf>,
        entry_points: Vec<PathBuf>,
        graph: &FileGraph,
    ) -> FileReport {
        let usage = UsageReport::classify(files.iter().cloned(), |file| {
            closure.contains(file) || self.retained(&relative_slash_path(self.project_root, file))
        });

        let references = files
            .iter()
            .map(|file| {
                let referrers: Vec<PathBuf> = graph
                    .referrers(file)
                    .into_iter()
                    .filter(|(source, _)| *source != file.as_path())
                    .map(|(source, _)| source.to_path_buf())
                    .collect();
                (file.clone(), referrers)
            })
            .collect();

        debug!(
            "Files: {} collected, {} unused",
            usage.declared.len(),
            usage.unused.len()
        );

        FileReport {
            usage: usage.with_references(references),
            closure,
            entry_points,
        }
    }

    /// A dependency is used when any scanned file imports it
    pub fn dependencies(&self, generic: &[String], dev: &[String], facts: &FactSet) -> DependencyReport {
        DependencyReport {
            generic: self.dependency_group(generic, facts),
            dev: self.dependency_group(dev, facts),
        }
    }

    fn dependency_group(&self, names: &[String], facts: &FactSet) -> UsageReport<String> {
        let references = names
            .iter()
            .map(|name| {
                let mut files = facts.files_importing(name).to_vec();
                files.dedup();
                (name.clone(), files)
            })
            .collect();

        UsageReport::classify(names.iter().cloned(), |name| {
            !facts.files_importing(name).is_empty() || self.retained(name)
        })
        .with_references(references)
    }

    fn retained(&self, item: &str) -> bool {
        let retained = self.config.should_retain(item);
        if retained {
            debug!("Retained by pattern: {}", item);
        }
        retained
    }
}
