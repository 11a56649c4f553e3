//! Configuration management

use crate::error::{Result, SiteWiseError};
use crate::search::SynthesisFallback;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Hosted completion service
    #[serde(default)]
    pub llm: GatewayConfig,

    /// Document-intelligence (OCR) service
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Persistence backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Knowledge search behaviour
    #[serde(default)]
    pub search: SearchConfig,
}

/// Model tier requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Fast,
    #[default]
    Capable,
}

/// Completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the hosted service (e.g. https://my-resource.openai.azure.com)
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: Option<String>,

    /// API key
    #[serde(default = "default_llm_key")]
    pub key: Option<String>,

    /// Deployment used for the capable tier
    #[serde(default = "default_deployment")]
    pub deployment_name: String,

    /// Deployment used for the fast tier (falls back to `deployment_name`)
    #[serde(default = "default_fast_deployment")]
    pub fast_deployment_name: Option<String>,

    #[serde(default = "default_llm_api_version")]
    pub api_version: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Extra attempts after a failed call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl GatewayConfig {
    /// A configuration with no credentials; every call is simulated.
    pub fn unconfigured() -> Self {
        Self {
            endpoint: None,
            key: None,
            deployment_name: "gpt-4o".to_string(),
            fast_deployment_name: None,
            api_version: "2024-08-01-preview".to_string(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
        }
    }

    /// Credentials are present and non-empty
    pub fn is_configured(&self) -> bool {
        non_empty(&self.endpoint) && non_empty(&self.key)
    }

    /// Deployment name for a tier
    pub fn deployment_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Capable => &self.deployment_name,
            ModelTier::Fast => self
                .fast_deployment_name
                .as_deref()
                .unwrap_or(&self.deployment_name),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            key: default_llm_key(),
            deployment_name: default_deployment(),
            fast_deployment_name: default_fast_deployment(),
            api_version: default_llm_api_version(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

/// Document-intelligence service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: Option<String>,

    #[serde(default = "default_ocr_key")]
    pub key: Option<String>,

    #[serde(default = "default_ocr_api_version")]
    pub api_version: String,

    /// Prebuilt model used for text extraction
    #[serde(default = "default_ocr_model")]
    pub model_id: String,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Give up on a job after this many polls
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,

    /// Delay before the simulated extractor answers
    #[serde(default = "default_simulated_latency")]
    pub simulated_latency_ms: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl OcrConfig {
    /// A configuration with no credentials and no simulated delay.
    pub fn unconfigured() -> Self {
        Self {
            endpoint: None,
            key: None,
            api_version: default_ocr_api_version(),
            model_id: default_ocr_model(),
            poll_interval_ms: default_poll_interval(),
            max_polls: default_max_polls(),
            simulated_latency_ms: 0,
            timeout_secs: default_timeout(),
        }
    }

    pub fn is_configured(&self) -> bool {
        non_empty(&self.endpoint) && non_empty(&self.key)
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ocr_endpoint(),
            key: default_ocr_key(),
            api_version: default_ocr_api_version(),
            model_id: default_ocr_model(),
            poll_interval_ms: default_poll_interval(),
            max_polls: default_max_polls(),
            simulated_latency_ms: default_simulated_latency(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database; when unset the file store is used
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory for the JSON file store
    #[serde(default = "default_store_dir")]
    pub directory: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: std::env::var("SITEWISE_DB").ok().map(PathBuf::from),
            directory: default_store_dir(),
        }
    }
}

/// Knowledge search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// What to return when the synthesis call fails
    #[serde(default)]
    pub fallback: SynthesisFallback,

    /// Candidates handed to synthesis
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fallback: SynthesisFallback::default(),
            candidate_limit: default_candidate_limit(),
        }
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn default_llm_endpoint() -> Option<String> {
    std::env::var("SITEWISE_LLM_ENDPOINT").ok()
}

fn default_llm_key() -> Option<String> {
    std::env::var("SITEWISE_LLM_KEY").ok()
}

fn default_fast_deployment() -> Option<String> {
    std::env::var("SITEWISE_LLM_FAST_DEPLOYMENT").ok()
}

fn default_ocr_endpoint() -> Option<String> {
    std::env::var("SITEWISE_OCR_ENDPOINT").ok()
}

fn default_ocr_key() -> Option<String> {
    std::env::var("SITEWISE_OCR_KEY").ok()
}

fn default_deployment() -> String {
    std::env::var("SITEWISE_LLM_DEPLOYMENT").unwrap_or_else(|_| "gpt-4o".to_string())
}

fn default_llm_api_version() -> String {
    std::env::var("SITEWISE_LLM_API_VERSION")
        .unwrap_or_else(|_| "2024-08-01-preview".to_string())
}

fn default_ocr_api_version() -> String {
    "2024-11-30".to_string()
}

fn default_ocr_model() -> String {
    "prebuilt-read".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_max_polls() -> u32 {
    60
}

fn default_simulated_latency() -> u64 {
    std::env::var("SITEWISE_OCR_SIMULATED_LATENCY_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1500)
}

fn default_candidate_limit() -> usize {
    3
}

fn default_store_dir() -> PathBuf {
    std::env::var("SITEWISE_STORE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(crate::DATA_DIR_NAME)
                .join("store")
        })
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a path, falling back to defaults when it is missing
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Reject values that would make a service unusable
    pub fn validate(&self) -> Result<()> {
        if self.search.candidate_limit == 0 {
            return Err(SiteWiseError::Config(
                "search.candidate_limit must be at least 1".to_string(),
            ));
        }
        if self.ocr.max_polls == 0 {
            return Err(SiteWiseError::Config(
                "ocr.max_polls must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }
}
