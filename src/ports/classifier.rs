//! Intent classifier port.
//!
//! Abstracts the "understand one utterance" capability. Two variants exist:
//! a deterministic rule-based one and a model-backed one wrapped in a
//! bounded timeout. The dialogue manager depends only on this trait and
//! never learns which variant is active.

use async_trait::async_trait;

use crate::domain::dialogue::{CallDomain, Classification};

/// Port for utterance intent classification.
///
/// Implementations translate one utterance plus its domain context into a
/// [`Classification`]. The composition wired at startup must never surface
/// an error to the dialogue manager: failures fall back to the
/// deterministic rule path before reaching it.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify one utterance against a fixed domain context.
    async fn classify(
        &self,
        text: &str,
        domain: CallDomain,
    ) -> Result<Classification, ClassifierError>;

    /// Short implementation name for logging.
    fn name(&self) -> &'static str;
}

/// Classifier backend errors.
///
/// All of these are recoverable: the caller falls back to the rule path.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The backend did not answer inside the bounded timeout.
    #[error("classification timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Transport-level failure reaching the backend.
    #[error("classifier backend unreachable: {0}")]
    Http(String),

    /// The backend answered with something other than the JSON contract.
    #[error("unparseable classifier reply: {0}")]
    Parse(String),

    /// The backend is not configured or disabled.
    #[error("classifier backend unavailable: {0}")]
    Unavailable(String),
}
