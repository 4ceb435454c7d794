//! Rule-based classifier adapter.
//!
//! Wraps the deterministic keyword rules behind the classifier port. This
//! is both a standalone classifier (no backend configured) and the fallback
//! target of the failover composition.

use async_trait::async_trait;

use crate::domain::dialogue::{classify_rule_based, CallDomain, Classification};
use crate::ports::{ClassifierError, IntentClassifier};

/// Deterministic keyword classifier. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IntentClassifier for RuleBasedClassifier {
    async fn classify(
        &self,
        text: &str,
        domain: CallDomain,
    ) -> Result<Classification, ClassifierError> {
        Ok(classify_rule_based(text, domain))
    }

    fn name(&self) -> &'static str {
        "rule-based"
    }
}
