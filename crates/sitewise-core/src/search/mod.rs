//! Knowledge search
//!
//! Provides:
//! - Deterministic pseudo-embeddings and cosine similarity
//! - The built-in knowledge corpus
//! - The retrieval-augmented search agent

mod agent;
mod corpus;
mod embedding;

pub use agent::{ScoredDocument, SearchAgent, SynthesisFallback};
pub use corpus::{default_corpus, KnowledgeDocument};
pub use embedding::{cosine_similarity, pseudo_embed, EMBEDDING_DIMENSIONS};
