//! Built-in knowledge corpus

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A reference snippet in the internal knowledge base
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl KnowledgeDocument {
    pub fn new(title: &str, summary: &str, tags: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            summary: summary.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Text fed to the embedder: title, summary, then tags in sorted order
    pub fn embedding_text(&self) -> String {
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        format!("{} {} {}", self.title, self.summary, tags.join(" "))
    }
}

/// The four reference documents shipped with the assistant
pub fn default_corpus() -> Vec<KnowledgeDocument> {
    vec![
        KnowledgeDocument::new(
            "Seismic Failure Report",
            "Post-event survey of beam-column joint failures in Zone IV reinforced concrete frames, \
             tracing shear cracking to wide confining hoop spacing and missing cross-ties.",
            &["seismic", "structural", "ductile-detailing", "is-13920"],
        ),
        KnowledgeDocument::new(
            "Concrete Curing Guidelines",
            "Minimum curing durations, temperature limits and moisture retention methods for \
             M25 to M40 site-cast concrete in hot-weather conditions.",
            &["concrete", "curing", "quality", "is-456"],
        ),
        KnowledgeDocument::new(
            "Fire Egress Compliance Checklist",
            "Travel distance, exit width and protected staircase requirements for residential \
             blocks under NBC 2016 Part 4, with common plan-review findings.",
            &["compliance", "fire", "life-safety", "nbc-2016"],
        ),
        KnowledgeDocument::new(
            "Podium Cost Overrun Analysis",
            "Breakdown of capex overruns on podium-type developments, attributing most variance \
             to late redesign of transfer structures and basement dewatering.",
            &["cost", "capex", "podium", "risk"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_corpus_shape() {
        let corpus = default_corpus();
        assert_eq!(corpus.len(), 4);
        assert!(corpus.iter().any(|d| d.title == "Seismic Failure Report"));
    }

    #[test]
    fn test_embedding_text_sorts_tags() {
        let doc = KnowledgeDocument::new("T", "S", &["zeta", "alpha"]);
        assert_eq!(doc.embedding_text(), "T S alpha zeta");
    }
}
