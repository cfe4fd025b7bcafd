use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;

/// Used/unused partition of one declared universe
///
/// `used` and `unused` are disjoint and together cover `declared`;
/// `unused` keeps declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageReport<T: Ord> {
    /// Declared items, in declaration order without duplicates
    pub declared: Vec<T>,

    pub used: BTreeSet<T>,

    pub unused: Vec<T>,

    /// Item -> files that make it used
    pub references: BTreeMap<T, Vec<PathBuf>>,
}

impl<T: Ord + Clone + std::hash::Hash> UsageReport<T> {
    /// Partition `declared` with `is_used`
    pub fn classify(
        declared: impl IntoIterator<Item = T>,
        mut is_used: impl FnMut(&T) -> bool,
    ) -> Self {
        let mut seen = HashSet::new();
        let declared: Vec<T> = declared
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();

        let mut used = BTreeSet::new();
        let mut unused = Vec::new();
        for item in &declared {
            if is_used(item) {
                used.insert(item.clone());
            } else {
                unused.push(item.clone());
            }
        }

        Self {
            declared,
            used,
            unused,
            references: BTreeMap::new(),
        }
    }

    /// Attach referencing files; entries for undeclared items are dropped
    pub fn with_references(mut self, references: BTreeMap<T, Vec<PathBuf>>) -> Self {
        self.references = references
            .into_iter()
            .filter(|(item, files)| !files.is_empty() && self.used.contains(item))
            .collect();
        self
    }

    pub fn is_used(&self, item: &T) -> bool {
        self.used.contains(item)
    }

    pub fn references_to(&self, item: &T) -> &[PathBuf] {
        self.references
            .get(item)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

// Manual impl: the derive would require `T: Default`
impl<T: Ord> Default for UsageReport<T> {
    fn default() -> Self {
        Self {
            declared: Vec::new(),
            used: BTreeSet::new(),
            unused: Vec::new(),
            references: BTreeMap::new(),
        }
    }
}
