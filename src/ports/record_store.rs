//! Record store port.
//!
//! Append-only storage for finalized records, keyed by the call that
//! produced them. The `find_by_call`/`insert` pair is what makes
//! finalization idempotent across transport retries.

use async_trait::async_trait;

use crate::domain::foundation::{CallId, DomainError};
use crate::domain::records::{Inquiry, Record, Reservation};

/// Totals for the admin stats endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub reservations: u64,
    pub inquiries: u64,
}

/// Port for finalized record persistence.
///
/// At most one record exists per call id. `insert` must enforce this:
/// inserting a second record for the same call fails with
/// `ErrorCode::RecordExists`, and the caller re-reads the original.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the record already finalized for a call, if any.
    async fn find_by_call(&self, call_id: &CallId) -> Result<Option<Record>, DomainError>;

    /// Appends a freshly finalized record for a call.
    ///
    /// # Errors
    ///
    /// - `RecordExists` when a record for the call was already inserted
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, call_id: &CallId, record: &Record) -> Result<(), DomainError>;

    /// Most recent reservations, newest first.
    async fn recent_reservations(&self, limit: u32) -> Result<Vec<Reservation>, DomainError>;

    /// Most recent inquiries, newest first.
    async fn recent_inquiries(&self, limit: u32) -> Result<Vec<Inquiry>, DomainError>;

    /// Record totals across both kinds.
    async fn counts(&self) -> Result<RecordCounts, DomainError>;
}
