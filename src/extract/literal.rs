/// Finds which candidate strings a file's text contains verbatim
#[derive(Debug, Clone, Default)]
pub struct LiteralMatcher {
    candidates: Vec<String>,
}

impl LiteralMatcher {
    pub fn new(candidates: &[String]) -> Self {
        Self {
            candidates: candidates.to_vec(),
        }
    }

    /// Candidates found in `contents`, in candidate order
    pub fn find<'a>(&'a self, contents: &str) -> Vec<&'a str> {
        self.candidates
            .iter()
            .filter(|candidate| !candidate.is_empty() && contents.contains(candidate.as_str()))
            .map(String::as_str)
            .collect()
    }
}
