use crate::discovery::SourceFile;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// A `static const` inside a class body bound to a declared resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasDeclaration {
    /// Enclosing class name
    pub scope: String,

    /// Constant name
    pub name: String,

    /// The literal the constant is bound to
    pub resource: String,

    /// File the declaration was scanned from
    pub file: PathBuf,
}

impl AliasDeclaration {
    /// Fully-qualified usage form, `Scope.name`
    pub fn key(&self) -> String {
        format!("{}.{}", self.scope, self.name)
    }
}

/// Extracts alias declarations whose literal belongs to a resource universe
#[derive(Debug, Clone)]
pub struct AliasExtractor {
    class_pattern: Regex,
    const_pattern: Regex,
    universe: HashSet<String>,
}

impl AliasExtractor {
    pub fn new(universe: &[String]) -> Result<Self, regex::Error> {
        // Class bodies end at the first closing brace
        let class_pattern = Regex::new(r"class\s+(\w+)\s*\{([\s\S]*?)\}")?;
        let const_pattern =
            Regex::new(r#"static\s+const(?:\s+\w+)?\s+(\w+)\s*=\s*['"](.+?)['"]"#)?;

        Ok(Self {
            class_pattern,
            const_pattern,
            universe: universe.iter().cloned().collect(),
        })
    }

    /// All alias declarations in one file, in source order
    pub fn extract(&self, file: SourceFile<'_>) -> Vec<AliasDeclaration> {
        let mut declarations = Vec::new();

        for class in self.class_pattern.captures_iter(file.contents) {
            let (Some(scope), Some(body)) = (class.get(1), class.get(2)) else {
                continue;
            };

            for constant in self.const_pattern.captures_iter(body.as_str()) {
                let (Some(name), Some(resource)) = (constant.get(1), constant.get(2)) else {
                    continue;
                };

                if !self.universe.contains(resource.as_str()) {
                    continue;
                }

                declarations.push(AliasDeclaration {
                    scope: scope.as_str().to_string(),
                    name: name.as_str().to_string(),
                    resource: resource.as_str().to_string(),
                    file: file.path.to_path_buf(),
                });
            }
        }

        declarations
    }
}

/// Pattern locating the declaration of `scope.name` anywhere in a file
pub fn definition_pattern(scope: &str, name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"class\s+{}\b[\s\S]*?static\s+const(?:\s+\w+)?\s+{}\s*=",
        regex::escape(scope),
        regex::escape(name)
    ))
}
