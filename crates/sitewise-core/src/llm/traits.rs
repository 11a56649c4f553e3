//! Provider trait definitions and gateway request types

use crate::config::ModelTier;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Backend that answers a structured (JSON) completion request
#[async_trait]
pub trait StructuredCompletionProvider: Send + Sync {
    /// Run the completion and return the raw message content
    async fn complete(&self, request: &StructuredRequest) -> Result<String>;

    /// Provider name for logs
    fn name(&self) -> &str;

    /// True when answers are hand-authored rather than model output
    fn is_simulated(&self) -> bool {
        false
    }
}

/// Backend that turns a document into plain text
#[async_trait]
pub trait DocumentExtractionProvider: Send + Sync {
    async fn extract(&self, document: &DocumentPayload) -> Result<Extraction>;

    fn name(&self) -> &str;

    fn is_simulated(&self) -> bool {
        false
    }
}

/// A structured completion request. Built per call, never mutated.
#[derive(Debug, Clone, Default)]
pub struct StructuredRequest {
    /// Instruction text
    pub prompt: String,
    /// Expected JSON shape, described for the model
    pub schema_hint: Option<String>,
    /// Supporting material sent as its own message (document text, candidates)
    pub context: Option<String>,
    /// Base64-encoded image for multimodal requests
    pub image_base64: Option<String>,
    pub tier: ModelTier,
}

impl StructuredRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_schema_hint(mut self, hint: impl Into<String>) -> Self {
        self.schema_hint = Some(hint.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_image(mut self, image_base64: impl Into<String>) -> Self {
        self.image_base64 = Some(image_base64.into());
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }
}

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Provider,
    Simulated,
}

/// Parsed JSON answer of caller-declared shape
#[derive(Debug, Clone, Serialize)]
pub struct StructuredResponse<T = serde_json::Value> {
    pub data: T,
    pub source: ResponseSource,
}

impl<T> StructuredResponse<T> {
    pub fn is_simulated(&self) -> bool {
        self.source == ResponseSource::Simulated
    }
}

/// Document bytes handed to an extraction provider
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl DocumentPayload {
    /// MIME type guessed from the file extension
    pub fn content_type(&self) -> &'static str {
        let ext = std::path::Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("tif") | Some("tiff") => "image/tiff",
            Some("bmp") => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

/// Text pulled out of a document
#[derive(Debug, Clone)]
pub struct Extraction {
    pub text: String,
    /// Mean word confidence, when the service reports one
    pub confidence: Option<f64>,
}
