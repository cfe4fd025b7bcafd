use crate::config::ReachabilityMode;
use crate::graph::{FileGraph, FileReference, ReferenceKind};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Computes the set of files considered in use
pub struct ReachabilityResolver {
    mode: ReachabilityMode,
}

impl ReachabilityResolver {
    pub fn new(mode: ReachabilityMode) -> Self {
        Self { mode }
    }

    /// Closure of used files, restricted to `universe`
    ///
    /// In `Direct` mode a file is used when it is an entry point, the target
    /// of any reference, or the source of a `part of`. Files referenced only
    /// by unused files still count. `Transitive` mode walks the graph forward
    /// from entry points and library declarations instead.
    pub fn closure(
        &self,
        graph: &FileGraph,
        references: &[FileReference],
        entry_points: &[PathBuf],
        universe: &BTreeSet<PathBuf>,
    ) -> BTreeSet<PathBuf> {
        let closure = match self.mode {
            ReachabilityMode::Direct => self.direct(references, entry_points),
            ReachabilityMode::Transitive => self.transitive(graph, entry_points),
        };

        let before = closure.len();
        let closure: BTreeSet<PathBuf> = closure
            .into_iter()
            .filter(|file| universe.contains(file))
            .collect();

        if before != closure.len() {
            debug!(
                "Dropped {} closure entries outside the collected files",
                before - closure.len()
            );
        }
        info!("Reachability ({:?}): {} files in use", self.mode, closure.len());

        closure
    }

    fn direct(&self, references: &[FileReference], entry_points: &[PathBuf]) -> BTreeSet<PathBuf> {
        let mut closure: BTreeSet<PathBuf> = references.iter().map(|r| r.target.clone()).collect();

        closure.extend(
            references
                .iter()
                .filter(|r| r.kind == ReferenceKind::PartOf)
                .map(|r| r.source.clone()),
        );
        closure.extend(entry_points.iter().cloned());
        closure
    }

    fn transitive(&self, graph: &FileGraph, entry_points: &[PathBuf]) -> BTreeSet<PathBuf> {
        let library_roots = graph.sources_of(ReferenceKind::Library);
        let roots = entry_points
            .iter()
            .chain(library_roots.iter())
            .map(PathBuf::as_path);
        graph.reachable_from(roots)
    }
}
