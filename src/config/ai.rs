//! Classifier backend configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Classifier backend configuration
///
/// Without an API key the process classifies with the deterministic keyword
/// rules alone. With one, a model-backed classifier runs first, wrapped in
/// the bounded timeout below, and the rule path remains the fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// OpenAI-compatible API key
    pub openai_api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat-completions base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bounded per-classification timeout in milliseconds
    ///
    /// The turn never stalls on the backend: past this deadline the
    /// deterministic rule path answers instead.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl ClassifierConfig {
    /// Timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// True when a model backend is configured
    pub fn has_model_backend(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate classifier configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms < 100 || self.timeout_ms > 30_000 {
            return Err(ValidationError::InvalidClassifierTimeout);
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}
