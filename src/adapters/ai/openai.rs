//! Model-backed classifier adapter (OpenAI-compatible chat completions).
//!
//! Prompts the model for a strict JSON object and maps it onto the domain
//! classification types. Any transport or contract violation surfaces as a
//! [`ClassifierError`]; the failover wrapper turns those into the rule path.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::dialogue::{CallDomain, Classification, Intent, Priority};
use crate::ports::{ClassifierError, IntentClassifier};

/// Configuration for the model-backed classifier.
#[derive(Debug, Clone)]
pub struct OpenAiClassifierConfig {
    api_key: Secret<String>,
    /// Model to use (e.g. "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiClassifierConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Classifier backed by an OpenAI-compatible chat completions API.
pub struct OpenAiClassifier {
    config: OpenAiClassifierConfig,
    client: Client,
}

impl OpenAiClassifier {
    /// Creates a new classifier with the given configuration.
    pub fn new(config: OpenAiClassifierConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn prompt_for(text: &str, domain: CallDomain) -> String {
        match domain {
            CallDomain::Restaurant => format!(
                "Classify this restaurant customer request:\n\"{}\"\n\n\
                 Categories: RESERVATION (booking or changing a table), \
                 MENU_INQUIRY (food, dishes, prices), HOURS_LOCATION \
                 (hours, address, directions), OTHER (anything else).\n\n\
                 Respond with only a JSON object: {{\"intent\": \"CATEGORY\", \
                 \"confidence\": 0.9, \"entities\": {{\"date\": null, \
                 \"time\": null, \"party_size\": null}}}}",
                text
            ),
            CallDomain::Financial => format!(
                "Classify this financial services request:\n\"{}\"\n\n\
                 Categories: ACCOUNT_INQUIRY (accounts, balances, statements, \
                 fraud), LOAN_APPLICATION (loans, credit, mortgages), GENERAL \
                 (anything else).\n\
                 Priority levels: URGENT (fraud, stolen card, locked account, \
                 emergency), HIGH (payment issues, deadlines), MEDIUM \
                 (general inquiries), LOW (information requests).\n\n\
                 Respond with only a JSON object: {{\"intent\": \"CATEGORY\", \
                 \"priority\": \"LEVEL\", \"confidence\": 0.9}}",
                text
            ),
        }
    }

    /// Maps the model's JSON reply onto a [`Classification`].
    fn parse_reply(content: &str, domain: CallDomain) -> Result<Classification, ClassifierError> {
        let trimmed = content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let wire: WireClassification = serde_json::from_str(trimmed)
            .map_err(|e| ClassifierError::Parse(format!("{}: {}", e, trimmed)))?;

        let mut classification = Classification::new(
            Intent::parse_in_domain(&wire.intent, domain),
            wire.confidence.unwrap_or(0.8).clamp(0.0, 1.0),
        );

        if domain == CallDomain::Financial {
            let priority = wire
                .priority
                .as_deref()
                .map(Priority::from_label)
                .unwrap_or(Priority::Medium);
            classification = classification.with_priority(priority);
        }

        for (name, value) in wire.entities {
            if let Some(value) = value {
                if !value.trim().is_empty() {
                    classification = classification.with_entity(name, value);
                }
            }
        }

        Ok(classification)
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClassifier {
    async fn classify(
        &self,
        text: &str,
        domain: CallDomain,
    ) -> Result<Classification, ClassifierError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You classify customer requests. Always respond with only a valid JSON object.".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::prompt_for(text, domain),
                },
            ],
            max_tokens: 200,
            temperature: 0.3,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifierError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Http(format!("{}: {}", status, body)));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        let content = reply
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| ClassifierError::Parse("empty choices".to_string()))?;

        Self::parse_reply(content, domain)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireClassification {
    intent: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    entities: BTreeMap<String, Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reply_maps_restaurant_contract() {
        let content = r#"{"intent": "RESERVATION", "confidence": 0.92,
            "entities": {"date": "March 5", "time": null, "party_size": "4"}}"#;

        let c = OpenAiClassifier::parse_reply(content, CallDomain::Restaurant).unwrap();
        assert_eq!(c.intent, Intent::Reservation);
        assert!((c.confidence - 0.92).abs() < f32::EPSILON);
        assert_eq!(c.entities.get("date").map(String::as_str), Some("March 5"));
        // Null entities are dropped, not stored as empty strings.
        assert!(!c.entities.contains_key("time"));
        assert_eq!(c.priority, None);
    }

    #[test]
    fn parse_reply_maps_financial_contract() {
        let content = r#"{"intent": "ACCOUNT_INQUIRY", "priority": "URGENT", "confidence": 0.95}"#;

        let c = OpenAiClassifier::parse_reply(content, CallDomain::Financial).unwrap();
        assert_eq!(c.intent, Intent::AccountInquiry);
        assert_eq!(c.priority, Some(Priority::Urgent));
    }

    #[test]
    fn parse_reply_tolerates_code_fences() {
        let content = "```json\n{\"intent\": \"MENU_INQUIRY\", \"confidence\": 0.9}\n```";
        let c = OpenAiClassifier::parse_reply(content, CallDomain::Restaurant).unwrap();
        assert_eq!(c.intent, Intent::MenuInquiry);
    }

    #[test]
    fn parse_reply_defaults_unknown_labels_per_domain() {
        let content = r#"{"intent": "SOMETHING_ELSE"}"#;

        let c = OpenAiClassifier::parse_reply(content, CallDomain::Restaurant).unwrap();
        assert_eq!(c.intent, Intent::Other);

        let c = OpenAiClassifier::parse_reply(content, CallDomain::Financial).unwrap();
        assert_eq!(c.intent, Intent::General);
        assert_eq!(c.priority, Some(Priority::Medium));
    }

    #[test]
    fn parse_reply_rejects_non_json() {
        let err = OpenAiClassifier::parse_reply("I think it's a reservation", CallDomain::Restaurant)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Parse(_)));
    }

    #[test]
    fn config_builder_works() {
        let config = OpenAiClassifierConfig::new("sk-test")
            .with_model("gpt-4o")
            .with_base_url("http://localhost:9999/v1")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
