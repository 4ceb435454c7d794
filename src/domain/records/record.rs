//! Reservation and inquiry record types.
//!
//! A record is an immutable snapshot of a completed session's fields. At
//! most one record exists per call; the record finalizer is its only
//! writer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::dialogue::Priority;
use crate::domain::foundation::{InquiryId, ReservationId, Timestamp};

/// Lifecycle status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

impl ReservationStatus {
    /// Returns the snake_case label stored on records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::NoShow => "no_show",
        }
    }

    /// Parses a stored label, defaulting to `Confirmed`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "cancelled" => ReservationStatus::Cancelled,
            "completed" => ReservationStatus::Completed,
            "no_show" => ReservationStatus::NoShow,
            _ => ReservationStatus::Confirmed,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A confirmed restaurant reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub date: String,
    pub time: String,
    pub party_size: u32,
    pub status: ReservationStatus,
    pub created_at: Timestamp,
}

/// An after-hours financial inquiry awaiting staff follow-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub reason: String,
    pub priority: Priority,
    pub call_time: Timestamp,
    pub follow_up_completed: bool,
}

/// Either kind of finalized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Reservation(Reservation),
    Inquiry(Inquiry),
}

impl Record {
    /// The caller's name, common to both kinds.
    pub fn caller_name(&self) -> &str {
        match self {
            Record::Reservation(r) => &r.name,
            Record::Inquiry(i) => &i.name,
        }
    }

    /// The caller's phone number, common to both kinds.
    pub fn caller_phone(&self) -> &str {
        match self {
            Record::Reservation(r) => &r.phone,
            Record::Inquiry(i) => &i.phone,
        }
    }
}
