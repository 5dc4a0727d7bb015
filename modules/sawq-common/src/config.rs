use std::env;

use tracing::info;

/// Default model for marketing copy generation.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Application configuration loaded from environment variables.
///
/// All long-lived API credentials live here and are handed to the clients at
/// startup, so nothing in the process reads ambient globals after boot.
#[derive(Debug, Clone)]
pub struct Config {
    // AI provider
    pub anthropic_api_key: String,
    pub claude_model: String,

    // Web search
    pub google_api_key: String,
    pub google_cse_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            claude_model: env::var("CLAUDE_MODEL")
                .unwrap_or_else(|_| DEFAULT_CLAUDE_MODEL.to_string()),
            google_api_key: required_env("GOOGLE_API_KEY"),
            google_cse_id: required_env("GOOGLE_CSE_ID"),
        }
    }

    /// Log which credentials are present without printing their values.
    pub fn log_redacted(&self) {
        info!(
            anthropic_api_key = !self.anthropic_api_key.is_empty(),
            google_api_key = !self.google_api_key.is_empty(),
            google_cse_id = !self.google_cse_id.is_empty(),
            model = self.claude_model.as_str(),
            "Config loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
