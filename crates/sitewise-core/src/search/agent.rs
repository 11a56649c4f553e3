//! Retrieval-augmented knowledge search
//!
//! Ranks the corpus against the query by pseudo-embedding cosine similarity,
//! then asks the gateway to annotate the top candidates.

use super::corpus::{default_corpus, KnowledgeDocument};
use super::embedding::{cosine_similarity, pseudo_embed};
use crate::config::{ModelTier, SearchConfig};
use crate::error::{Result, SiteWiseError};
use crate::llm::{LlmGateway, StructuredRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// What `search` returns when the synthesis call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisFallback {
    /// Return nothing
    #[default]
    Empty,
    /// Return the cosine-ranked candidates without annotations
    Candidates,
}

/// A knowledge document with its scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredDocument {
    #[serde(flatten)]
    pub document: KnowledgeDocument,
    pub vector_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_match_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_reason: Option<String>,
}

/// Knowledge search over a fixed corpus
pub struct SearchAgent {
    gateway: Arc<LlmGateway>,
    corpus: Vec<(KnowledgeDocument, Vec<f64>)>,
    candidate_limit: usize,
    fallback: SynthesisFallback,
}

impl SearchAgent {
    /// Agent over the built-in corpus
    pub fn new(gateway: Arc<LlmGateway>, config: &SearchConfig) -> Self {
        Self::with_corpus(gateway, default_corpus(), config)
    }

    /// Agent over a caller-supplied corpus
    pub fn with_corpus(
        gateway: Arc<LlmGateway>,
        corpus: Vec<KnowledgeDocument>,
        config: &SearchConfig,
    ) -> Self {
        let corpus = corpus
            .into_iter()
            .map(|doc| {
                let vector = pseudo_embed(&doc.embedding_text());
                (doc, vector)
            })
            .collect();

        Self {
            gateway,
            corpus,
            candidate_limit: config.candidate_limit,
            fallback: config.fallback,
        }
    }

    /// Cosine-ranked candidates for a query, best first
    pub fn rank_candidates(&self, query: &str) -> Vec<ScoredDocument> {
        let query_vector = pseudo_embed(query);

        let mut scored: Vec<ScoredDocument> = self
            .corpus
            .iter()
            .map(|(doc, vector)| ScoredDocument {
                document: doc.clone(),
                vector_score: cosine_similarity(&query_vector, vector),
                semantic_match_percentage: None,
                relevance_reason: None,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.vector_score
                .partial_cmp(&a.vector_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(self.candidate_limit);
        scored
    }

    /// Ranked, synthesized results. Ordering after synthesis is the model's.
    pub async fn search(&self, query: &str) -> Vec<ScoredDocument> {
        let candidates = self.rank_candidates(query);
        if candidates.is_empty() {
            return candidates;
        }

        tracing::debug!(
            "Synthesizing {} candidates for query {:?}",
            candidates.len(),
            query
        );

        match self.synthesize(query, &candidates).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Search synthesis failed for {:?}: {}", query, e);
                match self.fallback {
                    SynthesisFallback::Empty => Vec::new(),
                    SynthesisFallback::Candidates => candidates,
                }
            }
        }
    }

    async fn synthesize(
        &self,
        query: &str,
        candidates: &[ScoredDocument],
    ) -> Result<Vec<ScoredDocument>> {
        let request = StructuredRequest::new(build_synthesis_prompt(query))
            .with_schema_hint(
                r#"{"results": [{"title": "...", "summary": "...", "tags": [], "vectorScore": 0.0, "semanticMatchPercentage": 0-100, "relevanceReason": "..."}]}"#,
            )
            .with_context(serde_json::to_string(candidates)?)
            .with_tier(ModelTier::Fast);

        let response = self.gateway.complete_structured(&request).await?;
        merge_synthesis(&response.data, candidates)
    }
}

fn build_synthesis_prompt(query: &str) -> String {
    format!(
        r#"Query: "{}"
The previous message lists candidate knowledge snippets as JSON.
For every candidate, judge how well it answers the query and return
{{"results": [...]}} with each candidate's fields plus
semanticMatchPercentage (0-100) and relevanceReason (one sentence).
Order results from most to least relevant."#,
        query
    )
}

/// Attach the model's annotations to the candidates, in the model's order.
/// Entries are matched by title, then by position.
fn merge_synthesis(data: &Value, candidates: &[ScoredDocument]) -> Result<Vec<ScoredDocument>> {
    let entries = data["results"].as_array().ok_or_else(|| {
        SiteWiseError::MalformedOutput("synthesis response has no results array".to_string())
    })?;

    let merged = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let base = entry["title"]
                .as_str()
                .and_then(|title| candidates.iter().find(|c| c.document.title == title))
                .or_else(|| candidates.get(idx))?;

            let mut doc = base.clone();
            doc.semantic_match_percentage = percentage(&entry["semanticMatchPercentage"]);
            doc.relevance_reason = entry["relevanceReason"].as_str().map(str::to_string);
            Some(doc)
        })
        .collect();

    Ok(merged)
}

/// Accept `87`, `87.5` or `"87%"`
fn percentage(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| {
        value
            .as_str()
            .and_then(|s| s.trim().trim_end_matches('%').trim().parse().ok())
    })
}
