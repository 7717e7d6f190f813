//! EvidenceSet domain model.

use serde::{Deserialize, Serialize};

/// Separator placed between articles when building the evidence blob.
pub const EVIDENCE_SEPARATOR: &str = "\n\n";

/// Ordered article/fact-check summaries relevant to a claim.
///
/// Order is retrieval order. It carries no meaning for correctness but is
/// preserved for display and for blob construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceSet {
    articles: Vec<String>,
}

impl EvidenceSet {
    pub fn new(articles: Vec<String>) -> Self {
        Self { articles }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn articles(&self) -> &[String] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Joins all articles into the single text handed to the assessor.
    ///
    /// An empty set yields an empty string.
    pub fn to_blob(&self) -> String {
        self.articles.join(EVIDENCE_SEPARATOR)
    }
}

impl From<Vec<String>> for EvidenceSet {
    fn from(articles: Vec<String>) -> Self {
        Self::new(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_uses_blank_line_separator() {
        let set = EvidenceSet::new(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(set.to_blob(), "first\n\nsecond");
    }

    #[test]
    fn test_empty_set_yields_empty_blob() {
        assert_eq!(EvidenceSet::empty().to_blob(), "");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let set = EvidenceSet::new(vec!["a".to_string()]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a"]"#);
    }
}
