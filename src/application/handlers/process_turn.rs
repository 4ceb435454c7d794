//! ProcessTurnHandler - one turn of the dialogue state machine.
//!
//! Loads the call's session, classifies the utterance, runs the collection
//! sub-flow when the intent calls for it, and persists the session behind a
//! versioned put. Finalization happens at most once per call. Any
//! unexpected failure inside the turn is converted at this boundary into a
//! terminal, domain-specific apology; the session keeps its last persisted
//! state and the caller supplies the retry by speaking again.

use std::sync::Arc;

use tracing::Instrument;

use crate::domain::dialogue::{
    apology_reply, classify_rule_based, extract_fields, fallback_reply, financial_confirmation,
    question_for, reprompt, reservation_confirmation, CallDomain, CallSession, FieldSet, Intent,
};
use crate::domain::foundation::{CallId, DomainError, ErrorCode};
use crate::domain::records::{finalize, Record};
use crate::ports::{
    BusinessInfo, InfoTopic, IntentClassifier, Notifier, PutOutcome, RecordStore, SessionStore,
};

/// Non-checklist session field marking the active restaurant flow.
const FIELD_INTENT: &str = "intent";
const INTENT_RESERVATION: &str = "reservation";

/// One inbound turn: a single utterance within a call.
#[derive(Debug, Clone)]
pub struct TurnCommand {
    pub call_id: String,
    pub domain: CallDomain,
    pub utterance: String,
}

/// What the transport should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// Text spoken back to the caller.
    pub reply_text: String,
    /// Keep listening for the caller's next utterance.
    pub continue_listening: bool,
    /// Connect the caller to a staffed line.
    pub transfer_to_human: bool,
}

impl TurnReply {
    /// A reply that keeps the conversation going.
    pub fn ask(text: impl Into<String>) -> Self {
        Self {
            reply_text: text.into(),
            continue_listening: true,
            transfer_to_human: false,
        }
    }

    /// A terminal reply that ends the call gracefully.
    pub fn terminal(text: impl Into<String>) -> Self {
        Self {
            reply_text: text.into(),
            continue_listening: false,
            transfer_to_human: false,
        }
    }

    /// A terminal reply that hands the caller to a human.
    pub fn transfer(text: impl Into<String>) -> Self {
        Self {
            reply_text: text.into(),
            continue_listening: false,
            transfer_to_human: true,
        }
    }
}

/// Handler for processing one turn of a call.
pub struct ProcessTurnHandler {
    classifier: Arc<dyn IntentClassifier>,
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    info: Arc<dyn BusinessInfo>,
}

impl ProcessTurnHandler {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        sessions: Arc<dyn SessionStore>,
        records: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        info: Arc<dyn BusinessInfo>,
    ) -> Self {
        Self {
            classifier,
            sessions,
            records,
            notifier,
            info,
        }
    }

    /// Processes one turn. Never fails: internal errors become the
    /// domain-specific apology and the call ends gracefully.
    pub async fn handle(&self, cmd: TurnCommand) -> TurnReply {
        // Empty input re-prompts without touching the session.
        let call_id = match CallId::new(cmd.call_id.as_str()) {
            Ok(id) => id,
            Err(_) => {
                tracing::debug!(code = %ErrorCode::InputMissing, "turn arrived without a call id");
                return TurnReply::ask(reprompt());
            }
        };
        if cmd.utterance.trim().is_empty() {
            tracing::debug!(
                code = %ErrorCode::InputMissing,
                call_id = %call_id,
                "no speech detected, re-prompting"
            );
            return TurnReply::ask(reprompt());
        }

        let span = tracing::info_span!("turn", call_id = %call_id, domain = %cmd.domain);
        match self
            .run_turn(&call_id, cmd.domain, &cmd.utterance)
            .instrument(span)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!(
                    call_id = %call_id,
                    error = %err,
                    "turn failed, ending call gracefully"
                );
                match cmd.domain {
                    CallDomain::Restaurant => {
                        TurnReply::transfer(apology_reply(CallDomain::Restaurant))
                    }
                    CallDomain::Financial => {
                        TurnReply::terminal(apology_reply(CallDomain::Financial))
                    }
                }
            }
        }
    }

    async fn run_turn(
        &self,
        call_id: &CallId,
        requested_domain: CallDomain,
        utterance: &str,
    ) -> Result<TurnReply, DomainError> {
        // Load the session, creating lazily on the first turn. The stored
        // domain wins over the request's: a retry cannot flip the call.
        let session = match self.sessions.get(call_id).await? {
            Some(session) => session,
            None => CallSession::new(call_id.clone(), requested_domain),
        };
        let domain = session.domain();

        let classification = match self.classifier.classify(utterance, domain).await {
            Ok(classification) => classification,
            Err(err) => {
                tracing::warn!(
                    code = %ErrorCode::ClassificationUnavailable,
                    error = %err,
                    "classifier unavailable, using rule fallback"
                );
                classify_rule_based(utterance, domain)
            }
        };
        tracing::debug!(
            intent = %classification.intent,
            confidence = classification.confidence as f64,
            "utterance classified"
        );

        // Restaurant informational intents answer and keep listening; the
        // financial line always collects after hours. An OTHER utterance
        // continues an already-started reservation (slot answers like
        // "March 5th at 7pm" carry no reservation keyword), which the
        // session marks with the `intent` field.
        let reservation_in_progress = session.field(FIELD_INTENT) == Some(INTENT_RESERVATION);
        let collecting = domain == CallDomain::Financial
            || classification.intent == Intent::Reservation
            || (classification.intent == Intent::Other && reservation_in_progress);
        if !collecting {
            let reply_text = match classification.intent {
                Intent::MenuInquiry => self.info.lookup(InfoTopic::Menu, utterance),
                Intent::HoursLocation => self.info.lookup(InfoTopic::HoursLocation, utterance),
                _ => fallback_reply(classification.intent).to_string(),
            };

            self.persist_with_retry(call_id, session, |mut fresh| {
                fresh.touch();
                fresh
            })
            .await?;
            return Ok(TurnReply::ask(reply_text));
        }

        // Collection sub-flow: classifier entities merge first, then the
        // pattern recognizers; first value wins throughout.
        let apply = |mut s: CallSession| -> CallSession {
            if domain == CallDomain::Restaurant {
                let marker: FieldSet = [(FIELD_INTENT.to_string(), INTENT_RESERVATION.to_string())]
                    .into_iter()
                    .collect();
                s.merge_fields(&marker);
            }
            s.merge_fields(&classification.entities);
            let updated = extract_fields(utterance, s.fields(), domain);
            s.merge_fields(&updated);
            s
        };

        let session = self.persist_with_retry(call_id, apply(session), apply).await?;

        match session.first_missing() {
            Some(missing) => Ok(TurnReply::ask(question_for(domain, missing))),
            None => self.complete(call_id, &session).await,
        }
    }

    /// Persists a session behind the versioned put.
    ///
    /// A first conflict reloads the stored session, re-applies this turn's
    /// merge onto it, and retries once. A second conflict is unexpected
    /// within one call and surfaces as an internal error.
    async fn persist_with_retry<F>(
        &self,
        call_id: &CallId,
        session: CallSession,
        apply: F,
    ) -> Result<CallSession, DomainError>
    where
        F: Fn(CallSession) -> CallSession,
    {
        let expected = session.version();
        match self.sessions.put(&session, expected).await? {
            PutOutcome::Committed { .. } => Ok(session),
            PutOutcome::Conflict => {
                tracing::warn!(
                    call_id = %call_id,
                    code = %ErrorCode::ExtractionConflict,
                    "session write lost a race, reloading and retrying merge"
                );

                let fresh = self.sessions.get(call_id).await?.ok_or_else(|| {
                    DomainError::internal("session vanished during conflict retry")
                })?;
                let expected = fresh.version();
                let merged = apply(fresh);

                match self.sessions.put(&merged, expected).await? {
                    PutOutcome::Committed { .. } => Ok(merged),
                    PutOutcome::Conflict => Err(DomainError::internal(
                        "session write conflicted twice in one turn",
                    )),
                }
            }
        }
    }

    /// Terminal path: finalize at most once per call and confirm.
    async fn complete(
        &self,
        call_id: &CallId,
        session: &CallSession,
    ) -> Result<TurnReply, DomainError> {
        let record = match self.records.find_by_call(call_id).await? {
            Some(existing) => existing,
            None => {
                let record = finalize(session)?;
                match self.records.insert(call_id, &record).await {
                    Ok(()) => {
                        tracing::info!(call_id = %call_id, "record finalized");
                        self.notifier.notify(&record).await;
                        record
                    }
                    Err(err) if err.code == ErrorCode::RecordExists => {
                        // Lost the insert race to a concurrent retry; the
                        // committed record is the one confirmed back.
                        self.records.find_by_call(call_id).await?.ok_or_else(|| {
                            DomainError::internal("record vanished after duplicate insert")
                        })?
                    }
                    Err(err) => return Err(err),
                }
            }
        };

        let reply_text = match &record {
            Record::Reservation(reservation) => reservation_confirmation(reservation),
            Record::Inquiry(inquiry) => financial_confirmation(inquiry),
        };
        Ok(TurnReply::terminal(reply_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::adapters::ai::RuleBasedClassifier;
    use crate::adapters::info::StaticBusinessInfo;
    use crate::adapters::notify::LogNotifier;
    use crate::adapters::store::{InMemoryRecordStore, InMemorySessionStore};
    use crate::config::RestaurantConfig;
    use crate::domain::records::{Inquiry, Reservation};
    use crate::ports::RecordCounts;

    fn handler_with(
        sessions: Arc<InMemorySessionStore>,
        records: Arc<InMemoryRecordStore>,
    ) -> ProcessTurnHandler {
        ProcessTurnHandler::new(
            Arc::new(RuleBasedClassifier::new()),
            sessions,
            records,
            Arc::new(LogNotifier::new()),
            Arc::new(StaticBusinessInfo::new(RestaurantConfig::default())),
        )
    }

    fn handler() -> ProcessTurnHandler {
        handler_with(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(InMemoryRecordStore::new()),
        )
    }

    fn turn(call_id: &str, domain: CallDomain, utterance: &str) -> TurnCommand {
        TurnCommand {
            call_id: call_id.to_string(),
            domain,
            utterance: utterance.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_utterance_reprompts_without_touching_session() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let handler = handler_with(sessions.clone(), Arc::new(InMemoryRecordStore::new()));

        let reply = handler
            .handle(turn("CA-1", CallDomain::Restaurant, "   "))
            .await;

        assert!(reply.continue_listening);
        assert!(reply.reply_text.contains("didn't catch"));
        assert_eq!(sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn blank_call_id_reprompts() {
        let reply = handler()
            .handle(turn("", CallDomain::Financial, "hello"))
            .await;

        assert!(reply.continue_listening);
        assert!(reply.reply_text.contains("didn't catch"));
    }

    #[tokio::test]
    async fn reservation_intent_asks_for_first_missing_field() {
        // Scenario A: the first reservation turn asks for the name.
        let reply = handler()
            .handle(turn("CA-1", CallDomain::Restaurant, "I'd like to make a reservation"))
            .await;

        assert!(reply.continue_listening);
        assert!(reply.reply_text.to_lowercase().contains("name"));
    }

    #[tokio::test]
    async fn reservation_flow_survives_keyword_less_slot_answers() {
        let handler = handler();

        handler
            .handle(turn("CA-1", CallDomain::Restaurant, "I'd like to make a reservation"))
            .await;
        // No reservation keyword in the answer, but the flow is in progress.
        let reply = handler
            .handle(turn("CA-1", CallDomain::Restaurant, "my name is john smith"))
            .await;

        assert!(reply.reply_text.to_lowercase().contains("phone"));
    }

    #[tokio::test]
    async fn other_intent_without_open_flow_gets_fallback_reply() {
        let reply = handler()
            .handle(turn("CA-1", CallDomain::Restaurant, "do you validate parking?"))
            .await;

        assert!(reply.continue_listening);
        assert!(reply.reply_text.contains("reservations"));
    }

    #[tokio::test]
    async fn menu_inquiry_answers_and_keeps_listening() {
        let reply = handler()
            .handle(turn("CA-1", CallDomain::Restaurant, "do you have salmon on the menu?"))
            .await;

        assert!(reply.continue_listening);
        assert!(!reply.transfer_to_human);
        assert!(reply.reply_text.contains("Salmon"));
    }

    #[tokio::test]
    async fn informational_turn_still_persists_the_session() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let handler = handler_with(sessions.clone(), Arc::new(InMemoryRecordStore::new()));

        handler
            .handle(turn("CA-1", CallDomain::Restaurant, "what are your hours?"))
            .await;

        assert_eq!(sessions.session_count().await, 1);
    }

    #[tokio::test]
    async fn stored_domain_wins_over_request_domain() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let handler = handler_with(sessions.clone(), Arc::new(InMemoryRecordStore::new()));

        handler
            .handle(turn("CA-1", CallDomain::Financial, "my name is jane doe"))
            .await;

        // A retried turn mislabeled as restaurant keeps collecting the
        // financial checklist.
        let reply = handler
            .handle(turn("CA-1", CallDomain::Restaurant, "555-123-4567"))
            .await;

        assert!(reply.reply_text.contains("calling about"));
    }

    #[tokio::test]
    async fn completing_financial_checklist_finalizes_once() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let records = Arc::new(InMemoryRecordStore::new());
        let handler = handler_with(sessions.clone(), records.clone());

        handler
            .handle(turn("CA-1", CallDomain::Financial, "my card was stolen, please help"))
            .await;
        handler
            .handle(turn("CA-1", CallDomain::Financial, "my name is jane doe"))
            .await;
        let reply = handler
            .handle(turn("CA-1", CallDomain::Financial, "you can reach me at 555-123-4567"))
            .await;

        assert!(!reply.continue_listening);
        assert!(reply.reply_text.contains("Jane Doe"));
        assert_eq!(records.record_count().await, 1);

        match records
            .find_by_call(&CallId::new("CA-1").unwrap())
            .await
            .unwrap()
            .unwrap()
        {
            Record::Inquiry(inquiry) => {
                assert_eq!(inquiry.phone, "+15551234567");
                assert_eq!(inquiry.reason, "my card was stolen, please help");
                assert_eq!(inquiry.priority.as_str(), "urgent");
            }
            other => panic!("expected inquiry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn replaying_completing_turn_does_not_duplicate_record() {
        let records = Arc::new(InMemoryRecordStore::new());
        let handler = handler_with(Arc::new(InMemorySessionStore::new()), records.clone());

        for utterance in ["I was locked out of my account", "my name is jane doe"] {
            handler.handle(turn("CA-1", CallDomain::Financial, utterance)).await;
        }

        let first = handler
            .handle(turn("CA-1", CallDomain::Financial, "call me at 555-123-4567"))
            .await;
        // Transport retry replays the terminal turn verbatim.
        let second = handler
            .handle(turn("CA-1", CallDomain::Financial, "call me at 555-123-4567"))
            .await;

        assert_eq!(records.record_count().await, 1);
        assert_eq!(first.reply_text, second.reply_text);
        assert!(!second.continue_listening);
    }

    struct FailingRecordStore;

    #[async_trait]
    impl RecordStore for FailingRecordStore {
        async fn find_by_call(&self, _: &CallId) -> Result<Option<Record>, DomainError> {
            Err(DomainError::database("records table unavailable"))
        }

        async fn insert(&self, _: &CallId, _: &Record) -> Result<(), DomainError> {
            Err(DomainError::database("records table unavailable"))
        }

        async fn recent_reservations(&self, _: u32) -> Result<Vec<Reservation>, DomainError> {
            Ok(Vec::new())
        }

        async fn recent_inquiries(&self, _: u32) -> Result<Vec<Inquiry>, DomainError> {
            Ok(Vec::new())
        }

        async fn counts(&self) -> Result<RecordCounts, DomainError> {
            Ok(RecordCounts::default())
        }
    }

    #[tokio::test]
    async fn internal_error_becomes_restaurant_transfer_apology() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let handler = ProcessTurnHandler::new(
            Arc::new(RuleBasedClassifier::new()),
            sessions.clone(),
            Arc::new(FailingRecordStore),
            Arc::new(LogNotifier::new()),
            Arc::new(StaticBusinessInfo::new(RestaurantConfig::default())),
        );

        // Walk the checklist to the finalizing turn; the record store then
        // fails and the turn boundary converts it into a transfer.
        for utterance in [
            "I'd like to book a table",
            "my name is john smith",
            "555-123-4567",
            "march 5th",
            "at 7pm",
        ] {
            let reply = handler.handle(turn("CA-1", CallDomain::Restaurant, utterance)).await;
            assert!(reply.continue_listening);
        }

        let reply = handler
            .handle(turn("CA-1", CallDomain::Restaurant, "for four people"))
            .await;

        assert!(!reply.continue_listening);
        assert!(reply.transfer_to_human);
        assert!(reply.reply_text.contains("apologize"));

        // The session kept its last persisted state; fields survive.
        let session = sessions
            .get(&CallId::new("CA-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.field("name"), Some("John Smith"));
    }

    #[tokio::test]
    async fn internal_error_becomes_financial_retry_apology() {
        let handler = ProcessTurnHandler::new(
            Arc::new(RuleBasedClassifier::new()),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(FailingRecordStore),
            Arc::new(LogNotifier::new()),
            Arc::new(StaticBusinessInfo::new(RestaurantConfig::default())),
        );

        for utterance in ["I lost access to my account", "my name is jane doe"] {
            handler.handle(turn("CA-1", CallDomain::Financial, utterance)).await;
        }
        let reply = handler
            .handle(turn("CA-1", CallDomain::Financial, "555-123-4567"))
            .await;

        assert!(!reply.continue_listening);
        assert!(!reply.transfer_to_human);
        assert!(reply.reply_text.contains("business hours"));
    }
}
