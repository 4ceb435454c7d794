//! Notification port.

use async_trait::async_trait;

use crate::domain::records::Record;

/// Port for outbound notifications about finalized records.
///
/// Fire-and-forget: implementations log their own failures and never
/// propagate them back to the dialogue manager. A lost notification must
/// not fail the caller's turn.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a freshly finalized record.
    async fn notify(&self, record: &Record);
}
