//! Intent and priority value objects for utterance classification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which of the two supported conversation tasks a call belongs to.
///
/// Fixed for the lifetime of the call; a turn arriving with a conflicting
/// domain keeps the one already stored on the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDomain {
    Restaurant,
    Financial,
}

impl CallDomain {
    /// Returns the lowercase wire label for this domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallDomain::Restaurant => "restaurant",
            CallDomain::Financial => "financial",
        }
    }
}

impl fmt::Display for CallDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "restaurant" => Ok(CallDomain::Restaurant),
            "financial" => Ok(CallDomain::Financial),
            other => Err(format!("unknown call domain: {}", other)),
        }
    }
}

/// Classified caller intent.
///
/// The restaurant variants select between the reservation sub-flow and the
/// informational replies; the financial variants only color the reply tone,
/// since every after-hours financial turn runs the collection sub-flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    // Restaurant intents
    Reservation,
    MenuInquiry,
    HoursLocation,
    Other,

    // Financial intents
    AccountInquiry,
    LoanApplication,
    General,
}

impl Intent {
    /// Returns the wire label used by the model-backed classifier contract.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Reservation => "RESERVATION",
            Intent::MenuInquiry => "MENU_INQUIRY",
            Intent::HoursLocation => "HOURS_LOCATION",
            Intent::Other => "OTHER",
            Intent::AccountInquiry => "ACCOUNT_INQUIRY",
            Intent::LoanApplication => "LOAN_APPLICATION",
            Intent::General => "GENERAL",
        }
    }

    /// Parses a label within the given domain, falling back to the domain's
    /// catch-all intent for anything unrecognized.
    pub fn parse_in_domain(label: &str, domain: CallDomain) -> Self {
        match (label.to_ascii_uppercase().as_str(), domain) {
            ("RESERVATION", CallDomain::Restaurant) => Intent::Reservation,
            ("MENU_INQUIRY", CallDomain::Restaurant) => Intent::MenuInquiry,
            ("HOURS_LOCATION", CallDomain::Restaurant) => Intent::HoursLocation,
            ("ACCOUNT_INQUIRY", CallDomain::Financial) => Intent::AccountInquiry,
            ("LOAN_APPLICATION", CallDomain::Financial) => Intent::LoanApplication,
            (_, CallDomain::Restaurant) => Intent::Other,
            (_, CallDomain::Financial) => Intent::General,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Follow-up priority for a financial inquiry.
///
/// Ordered so that comparisons express urgency: `Low < Medium < High <
/// Urgent`. Across turns a call's priority may only move up this ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Returns the lowercase label stored on records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Parses a label case-insensitively, defaulting to `Medium` for
    /// anything absent or unrecognized.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            "urgent" => Priority::Urgent,
            _ => Priority::Medium,
        }
    }

    /// Returns the higher of the two priorities. Escalation never reverses.
    pub fn escalate(self, other: Priority) -> Priority {
        self.max(other)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying one utterance. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Classified intent label.
    pub intent: Intent,
    /// Classifier confidence in [0, 1].
    pub confidence: f32,
    /// Priority hint (financial domain only).
    pub priority: Option<Priority>,
    /// Entity values the classifier surfaced alongside the intent.
    pub entities: BTreeMap<String, String>,
}

impl Classification {
    /// Creates a classification with no priority hint or entities.
    pub fn new(intent: Intent, confidence: f32) -> Self {
        Self {
            intent,
            confidence,
            priority: None,
            entities: BTreeMap::new(),
        }
    }

    /// Attaches a priority hint.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Attaches an extracted entity value.
    pub fn with_entity(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities.insert(name.into(), value.into());
        self
    }
}
