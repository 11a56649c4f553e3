//! Document-intelligence client (Azure Document Intelligence style)
//!
//! Submits the document bytes, then polls the returned operation until the
//! job finishes.

use super::retry::with_retries;
use super::traits::{DocumentExtractionProvider, DocumentPayload, Extraction};
use crate::config::OcrConfig;
use crate::error::{Result, SiteWiseError};
use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Poll response for an analyze operation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    content: String,
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
struct Word {
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    message: String,
}

enum PollState {
    Pending,
    Done(Extraction),
}

/// Document extraction over HTTP
pub struct AzureDocumentIntelligence {
    http_client: reqwest::Client,
    config: OcrConfig,
}

impl AzureDocumentIntelligence {
    pub fn new(config: OcrConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SiteWiseError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| SiteWiseError::MissingConfiguration("ocr.endpoint".to_string()))?;
        let key = self
            .config
            .key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SiteWiseError::MissingConfiguration("ocr.key".to_string()))?;
        Ok((endpoint, key))
    }

    /// Submit the document; returns the operation URL to poll
    async fn submit(&self, url: &str, key: &str, document: &DocumentPayload) -> Result<String> {
        let response = self
            .http_client
            .post(url)
            .header(KEY_HEADER, key)
            .header(reqwest::header::CONTENT_TYPE, document.content_type())
            .body(document.bytes.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SiteWiseError::ProviderStatus {
                status: status.as_u16(),
                message: format!("document service error: {}", body),
            });
        }

        operation_handle(response.headers())
    }

    async fn poll_once(&self, operation_url: &str, key: &str) -> Result<PollState> {
        let response = self
            .http_client
            .get(operation_url)
            .header(KEY_HEADER, key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SiteWiseError::ProviderStatus {
                status: status.as_u16(),
                message: format!("document poll failed: {}", body),
            });
        }

        let operation: AnalyzeOperation = serde_json::from_str(&body)
            .map_err(|e| SiteWiseError::Provider(format!("unreadable poll response: {}", e)))?;
        interpret_operation(operation)
    }
}

/// The operation URL the service hands back for a submitted document
fn operation_handle(headers: &reqwest::header::HeaderMap) -> Result<String> {
    headers
        .get("operation-location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            SiteWiseError::Provider("document service returned no operation handle".to_string())
        })
}

/// Call `poll` every `interval` until it reports a finished extraction,
/// giving up after `max_polls` pending answers.
async fn poll_until_done<F, Fut>(
    interval: Duration,
    max_polls: u32,
    mut poll: F,
) -> Result<Extraction>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollState>>,
{
    for attempt in 1..=max_polls {
        tokio::time::sleep(interval).await;
        match poll().await? {
            PollState::Done(extraction) => {
                tracing::debug!(
                    "Analysis finished after {} polls ({} chars)",
                    attempt,
                    extraction.text.len()
                );
                return Ok(extraction);
            }
            PollState::Pending => continue,
        }
    }

    Err(SiteWiseError::Provider(format!(
        "document analysis did not finish after {} polls",
        max_polls
    )))
}

fn interpret_operation(operation: AnalyzeOperation) -> Result<PollState> {
    match operation.status.as_str() {
        "succeeded" => {
            let result = operation.analyze_result.ok_or_else(|| {
                SiteWiseError::Provider("succeeded operation has no result".to_string())
            })?;
            let confidence = mean_word_confidence(&result.pages);
            Ok(PollState::Done(Extraction {
                text: result.content,
                confidence,
            }))
        }
        "failed" | "canceled" => Err(SiteWiseError::Provider(format!(
            "document analysis {}: {}",
            operation.status,
            operation.error.map(|e| e.message).unwrap_or_default()
        ))),
        _ => Ok(PollState::Pending),
    }
}

fn mean_word_confidence(pages: &[Page]) -> Option<f64> {
    let scores: Vec<f64> = pages
        .iter()
        .flat_map(|p| p.words.iter())
        .filter_map(|w| w.confidence)
        .collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

#[async_trait]
impl DocumentExtractionProvider for AzureDocumentIntelligence {
    async fn extract(&self, document: &DocumentPayload) -> Result<Extraction> {
        let (endpoint, key) = self.credentials()?;
        let url = format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
            endpoint.trim_end_matches('/'),
            self.config.model_id,
            self.config.api_version
        );

        let operation_url = with_retries("document submit", 1, || {
            self.submit(&url, key, document)
        })
        .await?;
        tracing::debug!("Submitted {} for analysis", document.name);

        let interval = Duration::from_millis(self.config.poll_interval_ms);
        poll_until_done(interval, self.config.max_polls, || {
            self.poll_once(&operation_url, key)
        })
        .await
    }

    fn name(&self) -> &str {
        &self.config.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use std::collections::VecDeque;

    fn operation(json: &str) -> AnalyzeOperation {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_running_is_pending() {
        let state = interpret_operation(operation(r#"{"status":"running"}"#)).unwrap();
        assert!(matches!(state, PollState::Pending));
    }

    #[test]
    fn test_succeeded_yields_text_and_confidence() {
        let op = operation(
            r#"{
                "status": "succeeded",
                "analyzeResult": {
                    "content": "GENERAL NOTES",
                    "pages": [{ "words": [{ "confidence": 0.9 }, { "confidence": 0.7 }] }]
                }
            }"#,
        );
        match interpret_operation(op).unwrap() {
            PollState::Done(extraction) => {
                assert_eq!(extraction.text, "GENERAL NOTES");
                assert!((extraction.confidence.unwrap() - 0.8).abs() < 1e-9);
            }
            PollState::Pending => panic!("expected a finished job"),
        }
    }

    #[test]
    fn test_failed_operation_is_provider_error() {
        let op = operation(r#"{"status":"failed","error":{"message":"corrupt file"}}"#);
        let err = interpret_operation(op).err().unwrap();
        assert!(matches!(err, SiteWiseError::Provider(ref m) if m.contains("corrupt file")));
    }

    /// Replays poll bodies in order, counting how many were consumed
    async fn run_polls(bodies: &[&str], max_polls: u32) -> (Result<Extraction>, usize) {
        let mut remaining: VecDeque<&str> = bodies.iter().copied().collect();
        let mut polls = 0;
        let result = poll_until_done(Duration::from_millis(500), max_polls, || {
            polls += 1;
            let body = remaining.pop_front().unwrap_or(r#"{"status":"running"}"#);
            let state = interpret_operation(operation(body));
            async move { state }
        })
        .await;
        (result, polls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_waits_through_pending_states() {
        let (result, polls) = run_polls(
            &[
                r#"{"status":"notStarted"}"#,
                r#"{"status":"running"}"#,
                r#"{"status":"succeeded","analyzeResult":{"content":"SECTION A-A"}}"#,
            ],
            5,
        )
        .await;
        assert_eq!(result.unwrap().text, "SECTION A-A");
        assert_eq!(polls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_stops_on_failed_operation() {
        let (result, polls) = run_polls(
            &[
                r#"{"status":"running"}"#,
                r#"{"status":"failed","error":{"message":"unsupported format"}}"#,
                r#"{"status":"succeeded","analyzeResult":{"content":"never read"}}"#,
            ],
            5,
        )
        .await;
        let err = result.err().unwrap();
        assert!(matches!(err, SiteWiseError::Provider(ref m) if m.contains("unsupported format")));
        assert_eq!(polls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_gives_up_after_max_polls() {
        let start = tokio::time::Instant::now();
        let (result, polls) = run_polls(&[], 4).await;
        let err = result.err().unwrap();
        assert!(matches!(err, SiteWiseError::Provider(ref m) if m.contains("after 4 polls")));
        assert_eq!(polls, 4);
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[test]
    fn test_operation_handle_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Operation-Location",
            HeaderValue::from_static("https://ocr.example/operations/42"),
        );
        assert_eq!(
            operation_handle(&headers).unwrap(),
            "https://ocr.example/operations/42"
        );
    }

    #[test]
    fn test_missing_operation_handle_is_provider_error() {
        let err = operation_handle(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, SiteWiseError::Provider(ref m) if m.contains("operation handle")));
    }

    #[tokio::test]
    async fn test_unconfigured_client_reports_missing_configuration() {
        let client = AzureDocumentIntelligence::new(OcrConfig::unconfigured()).unwrap();
        let err = client
            .extract(&DocumentPayload {
                name: "a.pdf".to_string(),
                bytes: vec![0],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SiteWiseError::MissingConfiguration(_)));
    }
}
