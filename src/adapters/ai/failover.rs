//! Failover classifier - bounded-timeout wrapper with rule fallback.
//!
//! Wraps a primary (typically model-backed) classifier. When the primary
//! errors or exceeds the deadline, the deterministic keyword rules answer
//! instead, so classification as seen by the dialogue manager never fails
//! and never stalls a turn.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::dialogue::{classify_rule_based, CallDomain, Classification};
use crate::ports::{ClassifierError, IntentClassifier};

/// Classifier wrapper with deadline-bounded failover to the rule path.
pub struct FailoverClassifier {
    primary: Arc<dyn IntentClassifier>,
    timeout: Duration,
}

impl FailoverClassifier {
    /// Creates a failover wrapper around a primary classifier.
    pub fn new(primary: Arc<dyn IntentClassifier>, timeout: Duration) -> Self {
        Self { primary, timeout }
    }
}

#[async_trait]
impl IntentClassifier for FailoverClassifier {
    async fn classify(
        &self,
        text: &str,
        domain: CallDomain,
    ) -> Result<Classification, ClassifierError> {
        match tokio::time::timeout(self.timeout, self.primary.classify(text, domain)).await {
            Ok(Ok(classification)) => Ok(classification),
            Ok(Err(err)) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    error = %err,
                    "classifier backend failed, using rule fallback"
                );
                Ok(classify_rule_based(text, domain))
            }
            Err(_) => {
                tracing::warn!(
                    primary = self.primary.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "classifier backend timed out, using rule fallback"
                );
                Ok(classify_rule_based(text, domain))
            }
        }
    }

    fn name(&self) -> &'static str {
        "failover"
    }
}
