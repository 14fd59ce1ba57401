use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single news query, from transport through decoding.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    InvalidPayload(String),

    #[error("Article {index} is malformed: {reason}")]
    InvalidArticle { index: usize, reason: String },
}
