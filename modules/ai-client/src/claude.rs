use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AiError, Result};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const DEFAULT_MAX_TOKENS: u32 = 1024;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: Role,
    pub content: String,
}

impl WireMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    pub content: Vec<ContentBlock>,
    #[allow(dead_code)]
    pub stop_reason: Option<String>,
}

impl ChatResponse {
    pub fn text(&self) -> Option<String> {
        self.content
            .iter()
            .map(|ContentBlock::Text { text }| text.clone())
            .next()
    }
}

// =============================================================================
// Claude client
// =============================================================================

/// Text-only client for the Anthropic Messages API.
pub struct Claude {
    api_key: String,
    model: String,
    max_tokens: u32,
    http: reqwest::Client,
    base_url: String,
}

impl Claude {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            http: reqwest::Client::new(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    pub fn from_env(model: &str) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| AiError::MissingApiKey)?;
        Ok(Self::new(&api_key, model))
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user prompt and return the model's text.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![WireMessage::user(prompt)],
            system: None,
        })
        .await
    }

    /// Send a system prompt plus a user prompt and return the model's text.
    pub async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        self.chat(ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![WireMessage::user(user)],
            system: Some(system.to_string()),
        })
        .await
    }

    async fn chat(&self, request: ChatRequest) -> Result<String> {
        let url = format!("{}/messages", self.base_url);

        debug!(model = %request.model, "Claude chat request");

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let response: ChatResponse = resp.json().await?;
        response.text().ok_or(AiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claude_new_keeps_model_and_defaults() {
        let ai = Claude::new("sk-ant-test", "claude-3-5-sonnet-20241022");
        assert_eq!(ai.model(), "claude-3-5-sonnet-20241022");
        assert_eq!(ai.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn with_base_url_strips_trailing_slash() {
        let ai = Claude::new("sk-ant-test", "m").with_base_url("http://127.0.0.1:9999/");
        assert_eq!(ai.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn chat_response_extracts_first_text_block() {
        let body = r#"{
            "content": [{"type": "text", "text": "مرحبا"}],
            "stop_reason": "end_turn"
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.text().as_deref(), Some("مرحبا"));
    }

    #[test]
    fn empty_content_yields_no_text() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(parsed.text().is_none());
    }

    #[test]
    fn request_omits_absent_system_prompt() {
        let request = ChatRequest {
            model: "m".to_string(),
            max_tokens: 64,
            messages: vec![WireMessage::user("hi")],
            system: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("system").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
