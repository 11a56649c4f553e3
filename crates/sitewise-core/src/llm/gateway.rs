//! Uniform entry point for structured completion and document extraction
//!
//! Provider failures degrade to simulation and never reach the caller.
//! Malformed JSON from a call that nominally succeeded does.

use super::client::AzureOpenAIClient;
use super::ocr::AzureDocumentIntelligence;
use super::simulation::{simulate, SimulatedCompletion, SimulatedExtractor};
use super::traits::{
    DocumentExtractionProvider, DocumentPayload, ResponseSource, StructuredCompletionProvider,
    StructuredRequest, StructuredResponse,
};
use crate::config::{GatewayConfig, OcrConfig};
use crate::error::{Result, SiteWiseError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;

/// Extracted text shorter than this is not usable downstream
pub const MIN_EXTRACTED_CHARS: usize = 50;

/// A document handed to the gateway for OCR
#[derive(Debug)]
pub enum DocumentSource {
    /// An opened file
    File { name: String, file: tokio::fs::File },
    /// Bytes already in memory
    Bytes { name: String, bytes: Vec<u8> },
    /// A bare URL; always rejected
    Url(String),
}

impl DocumentSource {
    /// Open a file on disk
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        Ok(Self::File { name, file })
    }

    /// Name used in logs and for content-type detection
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Bytes { name, .. } => name,
            Self::Url(url) => url,
        }
    }

    async fn into_payload(self) -> Result<DocumentPayload> {
        match self {
            Self::File { name, mut file } => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes).await?;
                Ok(DocumentPayload { name, bytes })
            }
            Self::Bytes { name, bytes } => Ok(DocumentPayload { name, bytes }),
            Self::Url(url) => Err(SiteWiseError::UnsupportedInput(format!(
                "{} (document analysis needs an opened file, not a URL)",
                url
            ))),
        }
    }
}

/// Extracted text plus what the gateway knows about how it was produced
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub confidence: Option<f64>,
    pub source: ResponseSource,
}

/// Gateway over a completion provider and a document-extraction provider
pub struct LlmGateway {
    completion: Arc<dyn StructuredCompletionProvider>,
    extractor: Arc<dyn DocumentExtractionProvider>,
    simulated_extractor: SimulatedExtractor,
}

impl LlmGateway {
    /// Create from explicit providers
    pub fn new(
        completion: Arc<dyn StructuredCompletionProvider>,
        extractor: Arc<dyn DocumentExtractionProvider>,
    ) -> Self {
        Self {
            completion,
            extractor,
            simulated_extractor: SimulatedExtractor::new(Duration::ZERO),
        }
    }

    /// Create from configuration. Unconfigured services are simulated
    /// without touching the network.
    pub fn from_config(llm: &GatewayConfig, ocr: &OcrConfig) -> Result<Self> {
        let latency = Duration::from_millis(ocr.simulated_latency_ms);

        let completion: Arc<dyn StructuredCompletionProvider> = if llm.is_configured() {
            Arc::new(AzureOpenAIClient::new(llm.clone())?)
        } else {
            tracing::info!("Completion service not configured; using simulated responses");
            Arc::new(SimulatedCompletion)
        };

        let extractor: Arc<dyn DocumentExtractionProvider> = if ocr.is_configured() {
            Arc::new(AzureDocumentIntelligence::new(ocr.clone())?)
        } else {
            tracing::info!("Document service not configured; using simulated extraction");
            Arc::new(SimulatedExtractor::new(latency))
        };

        Ok(Self {
            completion,
            extractor,
            simulated_extractor: SimulatedExtractor::new(latency),
        })
    }

    /// Fully simulated gateway with no delays
    pub fn simulated() -> Self {
        Self::new(
            Arc::new(SimulatedCompletion),
            Arc::new(SimulatedExtractor::new(Duration::ZERO)),
        )
    }

    /// Ask for a structured JSON answer
    pub async fn complete_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse<Value>> {
        let (content, source) = match self.completion.complete(request).await {
            Ok(content) => (content, source_of(self.completion.is_simulated())),
            Err(SiteWiseError::MissingConfiguration(what)) => {
                tracing::debug!("{} not set; simulating completion", what);
                (simulate(request).to_string(), ResponseSource::Simulated)
            }
            Err(e) => {
                tracing::warn!(
                    "Completion provider {} failed, using simulated response: {}",
                    self.completion.name(),
                    e
                );
                (simulate(request).to_string(), ResponseSource::Simulated)
            }
        };

        let data = parse_json_content(&content)?;
        Ok(StructuredResponse { data, source })
    }

    /// Ask for a structured answer and decode it into `T`
    pub async fn complete_as<T: DeserializeOwned>(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse<T>> {
        let response = self.complete_structured(request).await?;
        let data = serde_json::from_value(response.data).map_err(|e| {
            SiteWiseError::MalformedOutput(format!("response does not match expected shape: {}", e))
        })?;
        Ok(StructuredResponse {
            data,
            source: response.source,
        })
    }

    /// OCR a document into plain text
    pub async fn analyze_document(&self, source: DocumentSource) -> Result<String> {
        self.extract_document(source).await.map(|doc| doc.text)
    }

    /// OCR a document, keeping confidence and provenance
    pub async fn extract_document(&self, source: DocumentSource) -> Result<ExtractedDocument> {
        let payload = source.into_payload().await?;

        let (extraction, source) = match self.extractor.extract(&payload).await {
            Ok(extraction) => (extraction, source_of(self.extractor.is_simulated())),
            Err(e) => {
                if matches!(e, SiteWiseError::MissingConfiguration(_)) {
                    tracing::debug!("Document service not set; simulating extraction");
                } else {
                    tracing::warn!(
                        "Document provider {} failed on {}, using simulated extraction: {}",
                        self.extractor.name(),
                        payload.name,
                        e
                    );
                }
                let extraction = self.simulated_extractor.extract(&payload).await?;
                (extraction, ResponseSource::Simulated)
            }
        };

        let chars = extraction.text.trim().chars().count();
        if chars < MIN_EXTRACTED_CHARS {
            return Err(SiteWiseError::InsufficientExtraction {
                chars,
                minimum: MIN_EXTRACTED_CHARS,
            });
        }

        Ok(ExtractedDocument {
            text: extraction.text,
            confidence: extraction.confidence,
            source,
        })
    }
}

fn source_of(simulated: bool) -> ResponseSource {
    if simulated {
        ResponseSource::Simulated
    } else {
        ResponseSource::Provider
    }
}

/// Parse message content as JSON, tolerating a markdown code fence or
/// chatter around a single object.
pub fn parse_json_content(content: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(content.trim()) {
        return Ok(value);
    }

    let json_str = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => {
            return Err(SiteWiseError::MalformedOutput(
                "No JSON object found in response".to_string(),
            ))
        }
    };

    serde_json::from_str(json_str)
        .map_err(|e| SiteWiseError::MalformedOutput(format!("Failed to parse response JSON: {}", e)))
}
