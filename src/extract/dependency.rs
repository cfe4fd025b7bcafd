use regex::Regex;

/// Import patterns that count as a use of one dependency
#[derive(Debug, Clone)]
pub struct DependencyPattern {
    name: String,
    patterns: Vec<Regex>,
}

impl DependencyPattern {
    /// Patterns for `name`
    ///
    /// Besides `package:<name>/...`, a name with underscores also matches
    /// every split into `package:<parent>/<child>.dart`, so `a_b_c` is found
    /// through `package:a/b_c.dart` and `package:a_b/c.dart`. Federated
    /// plugins expose their platform packages this way.
    pub fn new(name: &str) -> Result<Self, regex::Error> {
        let mut patterns = vec![Regex::new(&format!(
            r#"\b(?:import|export)\s+['"]package:{}/[^'"]*['"]"#,
            regex::escape(name)
        ))?];

        let parts: Vec<&str> = name.split('_').collect();
        for i in 1..parts.len() {
            let parent = parts[..i].join("_");
            let child = parts[i..].join("_");
            patterns.push(Regex::new(&format!(
                r#"\b(?:import|export)\s+['"]package:{}/{}\.dart['"]"#,
                regex::escape(&parent),
                regex::escape(&child)
            ))?);
        }

        Ok(Self {
            name: name.to_string(),
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, contents: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(contents))
    }
}

/// Detects which declared dependencies a file imports
#[derive(Debug, Clone, Default)]
pub struct DependencyMatcher {
    patterns: Vec<DependencyPattern>,
}

impl DependencyMatcher {
    pub fn new(names: &[String]) -> Result<Self, regex::Error> {
        let patterns = names
            .iter()
            .map(|name| DependencyPattern::new(name))
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    /// Names of dependencies imported by `contents`
    pub fn find<'a>(&'a self, contents: &str) -> Vec<&'a str> {
        self.patterns
            .iter()
            .filter(|pattern| pattern.matches(contents))
            .map(DependencyPattern::name)
            .collect()
    }
}
