use thiserror::Error;

pub type Result<T> = std::result::Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Anthropic API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no text content")]
    EmptyResponse,

    #[error("ANTHROPIC_API_KEY environment variable not set")]
    MissingApiKey,
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Network(err.to_string())
    }
}
