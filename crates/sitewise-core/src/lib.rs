//! SiteWise Core Library
//!
//! Construction-document intelligence behind the `sitewise` CLI.
//!
//! # Features
//! - LLM gateway for structured JSON completion and document OCR, with
//!   deterministic simulation when hosted services are absent or failing
//! - Retrieval-augmented knowledge search over an embedded corpus
//! - Master analysis reports projected into role-scoped views
//! - Report and query history in SQLite or plain JSON files

pub mod config;
pub mod error;
pub mod llm;
pub mod report;
pub mod search;
pub mod store;

pub use config::{Config, GatewayConfig, ModelTier, OcrConfig, SearchConfig, StoreConfig};
pub use error::{Error, Result, SiteWiseError};
pub use llm::{
    DocumentExtractionProvider, DocumentSource, ExtractedDocument, LlmGateway, ResponseSource,
    StructuredCompletionProvider, StructuredRequest, StructuredResponse,
};
pub use report::{project, AnalysisPipeline, MasterAnalysisReport, Role, RoleProjection};
pub use search::{ScoredDocument, SearchAgent, SynthesisFallback};
pub use store::{open_store, DocumentStore, StoredDocument};

/// Default data directory name
pub const DATA_DIR_NAME: &str = "sitewise";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "sitewise";
