//! Directed graph of structural references between Dart files

mod reference;

pub use reference::{FileReference, ReferenceKind};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// File reference graph
///
/// Nodes are absolute file paths, edges are the references between them.
#[derive(Debug, Default)]
pub struct FileGraph {
    inner: DiGraph<PathBuf, ReferenceKind>,
    node_map: HashMap<PathBuf, NodeIndex>,
}

impl FileGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from extracted references
    ///
    /// `part of` edges are also added in reverse so that walking forward
    /// from a library reaches its parts.
    pub fn from_references<'a>(references: impl IntoIterator<Item = &'a FileReference>) -> Self {
        let mut graph = Self::new();
        for reference in references {
            graph.add_reference(reference);
            if reference.kind == ReferenceKind::PartOf {
                let from = graph.add_file(&reference.target);
                let to = graph.add_file(&reference.source);
                graph.inner.add_edge(from, to, ReferenceKind::Part);
            }
        }
        graph
    }

    /// Add a file node, returning the existing node if already present
    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(path) {
            return idx;
        }
        let idx = self.inner.add_node(path.to_path_buf());
        self.node_map.insert(path.to_path_buf(), idx);
        idx
    }

    pub fn add_reference(&mut self, reference: &FileReference) {
        let from = self.add_file(&reference.source);
        let to = self.add_file(&reference.target);
        self.inner.add_edge(from, to, reference.kind);
    }

    /// Files with at least one edge of `kind` leaving them
    pub fn sources_of(&self, kind: ReferenceKind) -> BTreeSet<PathBuf> {
        self.inner
            .edge_references()
            .filter(|edge| *edge.weight() == kind)
            .filter_map(|edge| self.inner.node_weight(edge.source()).cloned())
            .collect()
    }

    /// Files referencing `path`, with the kind of each reference
    pub fn referrers(&self, path: &Path) -> Vec<(&Path, ReferenceKind)> {
        let Some(&idx) = self.node_map.get(path) else {
            return Vec::new();
        };

        let mut referrers: Vec<_> = self
            .inner
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| {
                let source = self.inner.node_weight(edge.source())?;
                Some((source.as_path(), *edge.weight()))
            })
            .collect();
        referrers.sort();
        referrers.dedup();
        referrers
    }

    /// Every file reachable by walking edges forward from `roots`, roots included
    pub fn reachable_from<'a>(&self, roots: impl IntoIterator<Item = &'a Path>) -> BTreeSet<PathBuf> {
        let mut reachable = BTreeSet::new();

        for root in roots {
            let Some(&start) = self.node_map.get(root) else {
                reachable.insert(root.to_path_buf());
                continue;
            };

            let mut dfs = Dfs::new(&self.inner, start);
            while let Some(idx) = dfs.next(&self.inner) {
                if let Some(path) = self.inner.node_weight(idx) {
                    reachable.insert(path.clone());
                }
            }
        }

        reachable
    }

    pub fn file_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn reference_count(&self) -> usize {
        self.inner.edge_count()
    }
}
