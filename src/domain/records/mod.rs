//! Finalized business records produced from completed call sessions.

mod finalize;
mod record;

pub use finalize::finalize;
pub use record::{Inquiry, Record, Reservation, ReservationStatus};
