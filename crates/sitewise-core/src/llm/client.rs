//! HTTP client for hosted chat-completion deployments (Azure OpenAI style)

use super::retry::with_retries;
use super::traits::{StructuredCompletionProvider, StructuredRequest};
use crate::config::GatewayConfig;
use crate::error::{Result, SiteWiseError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const SYSTEM_PROMPT: &str = "You are a construction engineering analyst. \
     Respond ONLY with a single valid JSON object and no additional text.";

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

/// Plain text, or a list of parts when an image rides along
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// User message carrying a base64 image as a `data:` URL
    pub fn user_with_image(text: impl Into<String>, image_base64: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/png;base64,{}", image_base64),
                    },
                },
            ]),
        }
    }
}

/// Build the message list for a structured request
pub fn build_messages(request: &StructuredRequest) -> Vec<ChatMessage> {
    let system = match request.schema_hint {
        Some(ref hint) => format!("{}\nExpected JSON shape: {}", SYSTEM_PROMPT, hint),
        None => SYSTEM_PROMPT.to_string(),
    };

    let mut messages = vec![ChatMessage::system(system)];
    if let Some(ref context) = request.context {
        messages.push(ChatMessage::user(context.clone()));
    }
    messages.push(match request.image_base64 {
        Some(ref image) => ChatMessage::user_with_image(request.prompt.clone(), image),
        None => ChatMessage::user(request.prompt.clone()),
    });
    messages
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Either a success or an error envelope
#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
}

/// Azure-OpenAI-compatible completion client
pub struct AzureOpenAIClient {
    http_client: reqwest::Client,
    config: GatewayConfig,
}

impl AzureOpenAIClient {
    /// Create client from configuration
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(SiteWiseError::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn completion_url(&self, endpoint: &str, deployment: &str) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            deployment,
            self.config.api_version
        )
    }

    async fn send_once(&self, url: &str, key: &str, body: &ChatRequest<'_>) -> Result<String> {
        let response = self
            .http_client
            .post(url)
            .header("api-key", key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        parse_envelope(status.as_u16(), &text)
    }
}

/// Pull the message content out of a response body, or turn an error
/// envelope into a provider error.
fn parse_envelope(status: u16, body: &str) -> Result<String> {
    let envelope: Option<ChatEnvelope> = serde_json::from_str(body).ok();

    if let Some(err) = envelope.as_ref().and_then(|env| env.error.as_ref()) {
        return Err(SiteWiseError::ProviderStatus {
            status,
            message: format!("{}: {}", err.code.as_deref().unwrap_or("error"), err.message),
        });
    }

    if !(200..300).contains(&status) {
        return Err(SiteWiseError::ProviderStatus {
            status,
            message: format!("completion service error: {}", body),
        });
    }

    envelope
        .and_then(|env| env.choices.into_iter().next())
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| SiteWiseError::Provider("No content in completion response".to_string()))
}

#[async_trait]
impl StructuredCompletionProvider for AzureOpenAIClient {
    async fn complete(&self, request: &StructuredRequest) -> Result<String> {
        let endpoint = self
            .config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| SiteWiseError::MissingConfiguration("llm.endpoint".to_string()))?;
        let key = self
            .config
            .key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SiteWiseError::MissingConfiguration("llm.key".to_string()))?;

        let deployment = self.config.deployment_for(request.tier);
        let url = self.completion_url(endpoint, deployment);
        let messages = build_messages(request);
        let body = ChatRequest {
            messages: &messages,
            temperature: 0.2,
            max_tokens: 2048,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let start = Instant::now();
        let content = with_retries("chat completion", self.config.max_retries, || {
            self.send_once(&url, key, &body)
        })
        .await?;

        tracing::debug!(
            "Completion from {} in {}ms ({} chars)",
            deployment,
            start.elapsed().as_millis(),
            content.len()
        );
        Ok(content)
    }

    fn name(&self) -> &str {
        &self.config.deployment_name
    }
}
