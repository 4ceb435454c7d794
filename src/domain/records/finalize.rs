//! Record finalizer: converts a completed session into a durable record.

use crate::domain::dialogue::{CallDomain, CallSession};
use crate::domain::foundation::{DomainError, ErrorCode, InquiryId, ReservationId, Timestamp};

use super::record::{Inquiry, Record, Reservation, ReservationStatus};

/// Builds the finalized record for a completed session.
///
/// Re-validates the checklist defensively; by construction the dialogue
/// manager only calls this once every required field is present. The
/// financial `priority` field maps through the priority enum, defaulting
/// to medium when absent or unrecognized.
pub fn finalize(session: &CallSession) -> Result<Record, DomainError> {
    if let Some(missing) = session.first_missing() {
        return Err(DomainError::new(
            ErrorCode::RecordIncomplete,
            format!("cannot finalize: missing required field '{}'", missing),
        )
        .with_detail("call_id", session.call_id().as_str()));
    }

    let required = |name: &str| -> Result<String, DomainError> {
        session
            .field(name)
            .map(str::to_string)
            .ok_or_else(|| DomainError::new(
                ErrorCode::RecordIncomplete,
                format!("cannot finalize: missing required field '{}'", name),
            ))
    };
    let email = session.field("email").map(str::to_string);

    match session.domain() {
        CallDomain::Restaurant => {
            let raw_size = required("party_size")?;
            let party_size: u32 = raw_size.parse().map_err(|_| {
                DomainError::new(
                    ErrorCode::InvalidFormat,
                    format!("party_size '{}' is not a number", raw_size),
                )
            })?;

            Ok(Record::Reservation(Reservation {
                id: ReservationId::new(),
                name: required("name")?,
                phone: required("phone")?,
                email,
                date: required("date")?,
                time: required("time")?,
                party_size,
                status: ReservationStatus::Confirmed,
                created_at: Timestamp::now(),
            }))
        }
        CallDomain::Financial => Ok(Record::Inquiry(Inquiry {
            id: InquiryId::new(),
            name: required("name")?,
            phone: required("phone")?,
            email,
            reason: required("reason")?,
            priority: session.priority(),
            call_time: Timestamp::now(),
            follow_up_completed: false,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::{FieldSet, Priority};
    use crate::domain::foundation::CallId;

    fn session_with(domain: CallDomain, pairs: &[(&str, &str)]) -> CallSession {
        let mut session = CallSession::new(CallId::new("CA-final").unwrap(), domain);
        let fields: FieldSet = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        session.merge_fields(&fields);
        session
    }

    #[test]
    fn finalize_builds_reservation_from_complete_session() {
        let session = session_with(
            CallDomain::Restaurant,
            &[
                ("name", "John Smith"),
                ("phone", "+15551234567"),
                ("date", "March 5"),
                ("time", "7:00 PM"),
                ("party_size", "4"),
            ],
        );

        let record = finalize(&session).unwrap();
        match record {
            Record::Reservation(r) => {
                assert_eq!(r.name, "John Smith");
                assert_eq!(r.party_size, 4);
                assert_eq!(r.status, ReservationStatus::Confirmed);
                assert_eq!(r.email, None);
            }
            other => panic!("expected reservation, got {:?}", other),
        }
    }

    #[test]
    fn finalize_builds_inquiry_with_session_priority() {
        let session = session_with(
            CallDomain::Financial,
            &[
                ("name", "Jane Doe"),
                ("phone", "+15559876543"),
                ("reason", "my card was stolen"),
                ("priority", "urgent"),
            ],
        );

        let record = finalize(&session).unwrap();
        match record {
            Record::Inquiry(i) => {
                assert_eq!(i.priority, Priority::Urgent);
                assert_eq!(i.reason, "my card was stolen");
                assert!(!i.follow_up_completed);
            }
            other => panic!("expected inquiry, got {:?}", other),
        }
    }

    #[test]
    fn finalize_defaults_priority_to_medium() {
        let session = session_with(
            CallDomain::Financial,
            &[("name", "Jane"), ("phone", "+15550000000"), ("reason", "q")],
        );

        match finalize(&session).unwrap() {
            Record::Inquiry(i) => assert_eq!(i.priority, Priority::Medium),
            other => panic!("expected inquiry, got {:?}", other),
        }
    }

    #[test]
    fn finalize_rejects_incomplete_session() {
        let session = session_with(CallDomain::Financial, &[("name", "Jane")]);

        let err = finalize(&session).unwrap_err();
        assert_eq!(err.code, ErrorCode::RecordIncomplete);
        assert!(err.message.contains("phone"));
    }

    #[test]
    fn finalize_rejects_non_numeric_party_size() {
        let session = session_with(
            CallDomain::Restaurant,
            &[
                ("name", "John"),
                ("phone", "+15551234567"),
                ("date", "March 5"),
                ("time", "7:00 PM"),
                ("party_size", "several"),
            ],
        );

        let err = finalize(&session).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn finalize_carries_optional_email() {
        let session = session_with(
            CallDomain::Financial,
            &[
                ("name", "Jane"),
                ("phone", "+15550000000"),
                ("reason", "q"),
                ("email", "jane@example.com"),
            ],
        );

        match finalize(&session).unwrap() {
            Record::Inquiry(i) => assert_eq!(i.email.as_deref(), Some("jane@example.com")),
            other => panic!("expected inquiry, got {:?}", other),
        }
    }
}
