//! Demo-mode notifier: logs what would have been sent.

use async_trait::async_trait;

use crate::domain::records::Record;
use crate::ports::Notifier;

/// Notifier used when no SMS credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, record: &Record) {
        match record {
            Record::Reservation(r) => {
                tracing::info!(
                    reservation_id = %r.id,
                    name = %r.name,
                    phone = %r.phone,
                    date = %r.date,
                    time = %r.time,
                    party_size = r.party_size,
                    "demo mode: would send reservation confirmation SMS"
                );
            }
            Record::Inquiry(i) => {
                tracing::info!(
                    inquiry_id = %i.id,
                    name = %i.name,
                    phone = %i.phone,
                    priority = %i.priority,
                    "demo mode: would notify staff of new inquiry"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::Priority;
    use crate::domain::foundation::{InquiryId, Timestamp};
    use crate::domain::records::Inquiry;

    #[tokio::test]
    async fn log_notifier_accepts_any_record() {
        let notifier = LogNotifier::new();
        let record = Record::Inquiry(Inquiry {
            id: InquiryId::new(),
            name: "Jane".to_string(),
            phone: "+15551234567".to_string(),
            email: None,
            reason: "q".to_string(),
            priority: Priority::Low,
            call_time: Timestamp::now(),
            follow_up_completed: false,
        });

        // Must never panic or block.
        notifier.notify(&record).await;
    }
}
