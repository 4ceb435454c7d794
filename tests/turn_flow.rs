//! End-to-end turn flow tests over the in-memory adapters.
//!
//! Each test drives the dialogue manager the way the transport does: one
//! stateless request per utterance, with continuity carried only by the
//! session store.

use std::sync::Arc;

use voiceline::adapters::ai::RuleBasedClassifier;
use voiceline::adapters::info::StaticBusinessInfo;
use voiceline::adapters::notify::LogNotifier;
use voiceline::adapters::store::{InMemoryRecordStore, InMemorySessionStore};
use voiceline::application::handlers::{ProcessTurnHandler, TurnCommand};
use voiceline::config::RestaurantConfig;
use voiceline::domain::dialogue::CallDomain;
use voiceline::domain::foundation::CallId;
use voiceline::domain::records::Record;
use voiceline::ports::{RecordStore, SessionStore};

struct Harness {
    handler: ProcessTurnHandler,
    sessions: Arc<InMemorySessionStore>,
    records: Arc<InMemoryRecordStore>,
}

impl Harness {
    fn new() -> Self {
        let sessions = Arc::new(InMemorySessionStore::new());
        let records = Arc::new(InMemoryRecordStore::new());
        let handler = ProcessTurnHandler::new(
            Arc::new(RuleBasedClassifier::new()),
            sessions.clone(),
            records.clone(),
            Arc::new(LogNotifier::new()),
            Arc::new(StaticBusinessInfo::new(RestaurantConfig::default())),
        );
        Self {
            handler,
            sessions,
            records,
        }
    }

    async fn say(
        &self,
        call_id: &str,
        domain: CallDomain,
        utterance: &str,
    ) -> voiceline::application::handlers::TurnReply {
        self.handler
            .handle(TurnCommand {
                call_id: call_id.to_string(),
                domain,
                utterance: utterance.to_string(),
            })
            .await
    }
}

#[tokio::test]
async fn scenario_a_reservation_request_asks_for_name_first() {
    let harness = Harness::new();

    let reply = harness
        .say("CA-a", CallDomain::Restaurant, "I'd like to make a reservation")
        .await;

    assert!(reply.continue_listening);
    assert!(!reply.transfer_to_human);
    assert!(reply.reply_text.to_lowercase().contains("name"));
}

#[tokio::test]
async fn scenario_b_full_reservation_flow_completes_with_one_record() {
    let harness = Harness::new();
    let call = "CA-b";

    let reply = harness
        .say(call, CallDomain::Restaurant, "I'd like to book a table")
        .await;
    assert!(reply.reply_text.to_lowercase().contains("name"));

    let reply = harness
        .say(call, CallDomain::Restaurant, "my name is john smith")
        .await;
    assert!(reply.reply_text.to_lowercase().contains("phone"));

    let reply = harness
        .say(call, CallDomain::Restaurant, "you can reach me at (555) 123-4567")
        .await;
    assert!(reply.reply_text.to_lowercase().contains("date"));

    // One utterance supplies the remaining three checklist fields.
    let reply = harness
        .say(call, CallDomain::Restaurant, "March 5th at 7pm for four")
        .await;

    assert!(!reply.continue_listening);
    assert!(reply.reply_text.contains("John Smith"));
    assert!(reply.reply_text.contains("March 5"));
    assert!(reply.reply_text.contains("7:00 PM"));
    assert!(reply.reply_text.contains('4'));

    assert_eq!(harness.records.record_count().await, 1);
    match harness
        .records
        .find_by_call(&CallId::new(call).unwrap())
        .await
        .unwrap()
        .unwrap()
    {
        Record::Reservation(reservation) => {
            assert_eq!(reservation.name, "John Smith");
            assert_eq!(reservation.phone, "+15551234567");
            assert_eq!(reservation.date, "March 5");
            assert_eq!(reservation.time, "7:00 PM");
            assert_eq!(reservation.party_size, 4);
        }
        other => panic!("expected reservation, got {:?}", other),
    }
}

#[tokio::test]
async fn scenario_c_urgency_keyword_forces_urgent_priority() {
    let harness = Harness::new();
    let call = "CA-c";

    // Urgency and topic keywords in the same utterance.
    harness
        .say(
            call,
            CallDomain::Financial,
            "my card was stolen and I have a question about my account balance",
        )
        .await;
    harness.say(call, CallDomain::Financial, "my name is jane doe").await;
    let reply = harness
        .say(call, CallDomain::Financial, "555-123-4567")
        .await;

    assert!(!reply.continue_listening);

    match harness
        .records
        .find_by_call(&CallId::new(call).unwrap())
        .await
        .unwrap()
        .unwrap()
    {
        Record::Inquiry(inquiry) => {
            assert_eq!(inquiry.priority.as_str(), "urgent");
            assert!(inquiry.reason.contains("stolen"));
        }
        other => panic!("expected inquiry, got {:?}", other),
    }
}

#[tokio::test]
async fn fields_supplied_in_any_order_still_ask_earliest_missing() {
    let harness = Harness::new();
    let call = "CA-order";

    // The caller volunteers later checklist fields up front.
    let reply = harness
        .say(
            call,
            CallDomain::Restaurant,
            "I'd like a table tomorrow at 6:30 pm for two",
        )
        .await;

    // Date, time, and party size are all captured, but the earliest missing
    // field is still the name.
    assert!(reply.reply_text.to_lowercase().contains("name"));

    let session = harness
        .sessions
        .get(&CallId::new(call).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.field("date"), Some("Tomorrow"));
    assert_eq!(session.field("time"), Some("6:30 PM"));
    assert_eq!(session.field("party_size"), Some("2"));
}

#[tokio::test]
async fn first_value_wins_across_turns() {
    let harness = Harness::new();
    let call = "CA-first";

    harness
        .say(call, CallDomain::Financial, "my name is jane doe")
        .await;
    // A later introduction cannot change the captured name.
    harness
        .say(call, CallDomain::Financial, "sorry, this is actually mark")
        .await;

    let session = harness
        .sessions
        .get(&CallId::new(call).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.field("name"), Some("Jane Doe"));
}

#[tokio::test]
async fn replayed_terminal_turn_is_idempotent() {
    let harness = Harness::new();
    let call = "CA-replay";

    harness
        .say(call, CallDomain::Financial, "I'm locked out of online banking")
        .await;
    harness.say(call, CallDomain::Financial, "my name is jane doe").await;

    let first = harness
        .say(call, CallDomain::Financial, "call me back at 555-123-4567")
        .await;
    let replay = harness
        .say(call, CallDomain::Financial, "call me back at 555-123-4567")
        .await;

    assert_eq!(harness.records.record_count().await, 1);
    assert_eq!(first.reply_text, replay.reply_text);
    assert!(!replay.continue_listening);
}

#[tokio::test]
async fn scenario_d_concurrent_final_turns_commit_exactly_one_record() {
    let harness = Harness::new();
    let call = "CA-race";

    harness
        .say(call, CallDomain::Financial, "there is fraud on my account")
        .await;
    harness.say(call, CallDomain::Financial, "my name is jane doe").await;

    // Two turns race to supply the final missing field (a transport retry
    // racing the original request).
    let final_turn = || harness.say(call, CallDomain::Financial, "my number is 555-123-4567");
    let (a, b) = tokio::join!(final_turn(), final_turn());

    assert_eq!(harness.records.record_count().await, 1);
    assert!(!a.continue_listening);
    assert!(!b.continue_listening);
    assert!(a.reply_text.contains("Jane Doe"));
    assert!(b.reply_text.contains("Jane Doe"));

    // The session kept every field despite the race.
    let session = harness
        .sessions
        .get(&CallId::new(call).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.field("phone"), Some("+15551234567"));
    assert_eq!(session.field("name"), Some("Jane Doe"));
}

#[tokio::test]
async fn menu_and_hours_questions_do_not_start_collection() {
    let harness = Harness::new();
    let call = "CA-info";

    let reply = harness
        .say(call, CallDomain::Restaurant, "what's on your menu?")
        .await;
    assert!(reply.continue_listening);

    let reply = harness
        .say(call, CallDomain::Restaurant, "and what are your hours?")
        .await;
    assert!(reply.continue_listening);
    assert!(reply.reply_text.contains("open"));

    assert_eq!(harness.records.record_count().await, 0);
    let session = harness
        .sessions
        .get(&CallId::new(call).unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(session.missing_fields().len() == 5);
}
