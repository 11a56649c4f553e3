//! Error types for sitewise

use thiserror::Error;

/// Result type alias using SiteWiseError
pub type Result<T> = std::result::Result<T, SiteWiseError>;

/// Error type alias for convenience
pub type Error = SiteWiseError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_INPUT: i32 = 3;
    pub const ANALYSIS_FAILED: i32 = 4;
}

/// Main error type for sitewise
#[derive(Debug, Error)]
pub enum SiteWiseError {
    /// Remote credentials are absent. Providers raise this; the gateway
    /// answers it with simulation and never lets it reach a caller.
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// Remote call failed or returned an error envelope.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Remote service answered with a failure status.
    #[error("Provider error (HTTP {status}): {message}")]
    ProviderStatus { status: u16, message: String },

    /// A nominally successful call returned content that is not the JSON we asked for.
    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    #[error("Insufficient extraction: got {chars} characters, need at least {minimum}")]
    InsufficientExtraction { chars: usize, minimum: usize },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl SiteWiseError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedInput(_) | Self::InvalidInput(_) | Self::Config(_) => {
                exit_codes::INVALID_INPUT
            }
            Self::MalformedOutput(_) | Self::InsufficientExtraction { .. } => {
                exit_codes::ANALYSIS_FAILED
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
