//! LLM and document-intelligence integration
//!
//! Provides:
//! - Provider traits for structured completion and document extraction
//! - HTTP implementations for hosted deployments
//! - Deterministic simulation used when services are absent or failing
//! - The gateway that ties them together

mod client;
mod gateway;
mod ocr;
mod retry;
mod simulation;
mod traits;

pub use client::{build_messages, AzureOpenAIClient, ChatMessage, MessageContent};
pub use gateway::{
    parse_json_content, DocumentSource, ExtractedDocument, LlmGateway, MIN_EXTRACTED_CHARS,
};
pub use ocr::AzureDocumentIntelligence;
pub use simulation::{
    classify, simulate, SimulatedCompletion, SimulatedExtractor, SimulationFamily,
    SIMULATED_DOCUMENT_TEXT,
};
pub use traits::*;
