//! Error types for the sentiment analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Reddit API credentials not found in environment variables")]
    MissingCredentials,

    #[error("Malformed response: missing field `{0}`")]
    MalformedResponse(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SentimentError {
    /// Message without the variant prefix, for errors that already carry
    /// their own wording
    pub fn detail(&self) -> String {
        match self {
            Self::Api(msg) | Self::Auth(msg) | Self::Internal(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SentimentError>;
