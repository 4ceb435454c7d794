//! Canned caller-facing reply text.
//!
//! Business facts (names, hours, addresses) are injected by the callers of
//! these functions; nothing deployment-specific lives here.

use super::intent::{CallDomain, Intent};
use crate::domain::records::{Inquiry, Reservation};

/// The question for the single first missing checklist field.
pub fn question_for(domain: CallDomain, field: &str) -> &'static str {
    match (domain, field) {
        (CallDomain::Restaurant, "name") => {
            "I'd be happy to help you with a reservation. Could I start with your full name?"
        }
        (CallDomain::Restaurant, "phone") => {
            "Thank you! What's the best phone number to confirm your reservation?"
        }
        (CallDomain::Restaurant, "date") => "What date would you like to dine with us?",
        (CallDomain::Restaurant, "time") => "And what time works best for your visit?",
        (CallDomain::Restaurant, "party_size") => "How many people will be joining us?",
        (CallDomain::Financial, "name") => {
            "I'll be happy to help you. First, could you tell me your full name?"
        }
        (CallDomain::Financial, "phone") => {
            "Thank you! And what's the best phone number for our team to reach you at?"
        }
        (CallDomain::Financial, "reason") => {
            "Perfect! Now, could you briefly tell me what you're calling about today?"
        }
        _ => "I need a bit more information. Could you repeat that?",
    }
}

/// Re-prompt when no speech was detected or the call id is missing.
pub fn reprompt() -> &'static str {
    "I'm sorry, I didn't catch that. Could you please repeat that?"
}

/// Terminal apology for an unexpected error inside a turn.
pub fn apology_reply(domain: CallDomain) -> &'static str {
    match domain {
        CallDomain::Restaurant => {
            "I apologize for the technical difficulty. Let me connect you with our team who can help you right away."
        }
        CallDomain::Financial => {
            "I apologize for the technical difficulty. Please call back during our business hours and our team will be happy to assist you."
        }
    }
}

/// Context-appropriate reply for an utterance outside every known intent.
pub fn fallback_reply(intent: Intent) -> &'static str {
    match intent {
        Intent::Other => {
            "I'm here to help with reservations, menu questions, or restaurant information. What can I assist you with?"
        }
        _ => "Thank you for calling. How can I help you today?",
    }
}

/// Confirmation read back once a reservation is finalized.
pub fn reservation_confirmation(reservation: &Reservation) -> String {
    format!(
        "Thank you, {}! Your table for {} is booked for {} at {}. We look forward to seeing you!",
        reservation.name, reservation.party_size, reservation.date, reservation.time
    )
}

/// Confirmation read back once a financial inquiry is recorded.
pub fn financial_confirmation(inquiry: &Inquiry) -> String {
    format!(
        "Thank you, {}! I've recorded your information and our team will contact you within 24 hours. Have a great day!",
        inquiry.name
    )
}
