use serde::Serialize;
use std::path::PathBuf;

/// Kind of structural reference between Dart files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `import '<path>';`
    Import,

    /// `export '<path>';`
    Export,

    /// `part '<path>';`
    Part,

    /// `part of '<path>';`
    PartOf,

    /// `library <name>;` (self-reference)
    Library,
}

impl ReferenceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReferenceKind::Import => "import",
            ReferenceKind::Export => "export",
            ReferenceKind::Part => "part",
            ReferenceKind::PartOf => "part of",
            ReferenceKind::Library => "library",
        }
    }
}

/// A directed edge from one file to another
///
/// `Library` references point back at their own source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileReference {
    pub kind: ReferenceKind,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl FileReference {
    pub fn new(kind: ReferenceKind, source: PathBuf, target: PathBuf) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }

    /// Self-reference marking a file as a library root
    pub fn library(source: PathBuf) -> Self {
        Self {
            kind: ReferenceKind::Library,
            target: source.clone(),
            source,
        }
    }

    pub fn is_self_reference(&self) -> bool {
        self.source == self.target
    }
}
