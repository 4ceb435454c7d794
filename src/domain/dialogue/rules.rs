//! Deterministic keyword classification rules.
//!
//! These are the fallback path behind the model-backed classifier and the
//! whole of the rule-based one. The financial precedence is a tie-break
//! contract: urgency keywords always win over topic keywords, even when
//! both appear in the same utterance.

use super::intent::{CallDomain, Classification, Intent, Priority};

const RESERVATION_KEYWORDS: &[&str] = &["reservation", "book", "table", "reserve"];
const MENU_KEYWORDS: &[&str] = &["menu", "food", "dish", "price", "cost"];
const HOURS_KEYWORDS: &[&str] = &["hours", "open", "close", "location", "address"];

const URGENT_KEYWORDS: &[&str] = &["fraud", "stolen", "unauthorized", "locked", "emergency", "hack"];
const HIGH_KEYWORDS: &[&str] = &["payment", "due", "deadline", "billing", "dispute", "access", "urgent"];
const ACCOUNT_KEYWORDS: &[&str] = &["account", "balance", "statement"];
const LOAN_KEYWORDS: &[&str] = &["loan", "credit", "mortgage"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Classifies one utterance with keyword rules. Never fails.
pub fn classify_rule_based(text: &str, domain: CallDomain) -> Classification {
    let lower = text.to_lowercase();

    match domain {
        CallDomain::Restaurant => {
            if contains_any(&lower, RESERVATION_KEYWORDS) {
                Classification::new(Intent::Reservation, 0.8)
            } else if contains_any(&lower, MENU_KEYWORDS) {
                Classification::new(Intent::MenuInquiry, 0.8)
            } else if contains_any(&lower, HOURS_KEYWORDS) {
                Classification::new(Intent::HoursLocation, 0.8)
            } else {
                Classification::new(Intent::Other, 0.5)
            }
        }
        CallDomain::Financial => {
            // Fraud/security keywords are checked first and always win.
            if contains_any(&lower, URGENT_KEYWORDS) {
                Classification::new(Intent::AccountInquiry, 0.8).with_priority(Priority::Urgent)
            } else if contains_any(&lower, ACCOUNT_KEYWORDS) {
                Classification::new(Intent::AccountInquiry, 0.8).with_priority(Priority::Medium)
            } else if contains_any(&lower, LOAN_KEYWORDS) {
                Classification::new(Intent::LoanApplication, 0.8).with_priority(Priority::Medium)
            } else {
                Classification::new(Intent::General, 0.5).with_priority(Priority::Medium)
            }
        }
    }
}

/// Derives a follow-up priority from one utterance's keywords.
///
/// Same precedence as classification: urgency keywords dominate, the
/// high-priority set comes second, everything else is `Medium`.
pub fn priority_for(text: &str) -> Priority {
    let lower = text.to_lowercase();

    if contains_any(&lower, URGENT_KEYWORDS) {
        Priority::Urgent
    } else if contains_any(&lower, HIGH_KEYWORDS) {
        Priority::High
    } else {
        Priority::Medium
    }
}
