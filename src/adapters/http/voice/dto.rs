//! DTOs for the voice endpoints.
//!
//! These mirror the transport-facing turn contract: utterance text in,
//! reply text plus continue/transfer signals out.

use serde::{Deserialize, Serialize};

use crate::application::handlers::TurnReply;
use crate::domain::records::{Inquiry, Reservation};

/// Body for `POST /voice/{domain}/open`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenCallRequest {
    /// Transport-assigned call identifier.
    pub call_id: String,
}

/// Body for `POST /voice/{domain}/turn`.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    /// Transport-assigned call identifier.
    pub call_id: String,
    /// Transcribed caller utterance; empty means no speech was detected.
    #[serde(default)]
    pub utterance: String,
}

/// Reply for both voice endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub reply_text: String,
    pub continue_listening: bool,
    pub transfer_to_human: bool,
}

impl From<TurnReply> for TurnResponse {
    fn from(reply: TurnReply) -> Self {
        Self {
            reply_text: reply.reply_text,
            continue_listening: reply.continue_listening,
            transfer_to_human: reply.transfer_to_human,
        }
    }
}

/// One reservation in the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub party_size: u32,
    pub status: String,
    pub created_at: String,
}

impl From<&Reservation> for ReservationView {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            phone: r.phone.clone(),
            date: r.date.clone(),
            time: r.time.clone(),
            party_size: r.party_size,
            status: r.status.to_string(),
            created_at: r.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// One inquiry in the admin listing.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryView {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub reason: String,
    pub priority: String,
    pub call_time: String,
    pub follow_up_completed: bool,
}

impl From<&Inquiry> for InquiryView {
    fn from(i: &Inquiry) -> Self {
        Self {
            id: i.id.to_string(),
            name: i.name.clone(),
            phone: i.phone.clone(),
            reason: i.reason.clone(),
            priority: i.priority.to_string(),
            call_time: i.call_time.as_datetime().to_rfc3339(),
            follow_up_completed: i.follow_up_completed,
        }
    }
}

/// Reply for `GET /admin/reservations`.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationsResponse {
    pub total: usize,
    pub reservations: Vec<ReservationView>,
}

/// Reply for `GET /admin/inquiries`.
#[derive(Debug, Clone, Serialize)]
pub struct InquiriesResponse {
    pub total: usize,
    pub inquiries: Vec<InquiryView>,
}

/// Reply for `GET /admin/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_reservations: u64,
    pub total_inquiries: u64,
    pub system_status: &'static str,
    pub version: &'static str,
}

/// Reply for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub restaurant: String,
    pub financial: String,
}

/// Error body for every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
