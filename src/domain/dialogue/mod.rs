//! Turn-based dialogue domain: intents, utterance recognizers, and the
//! per-call slot-filling session.

mod extract;
mod intent;
mod replies;
mod rules;
mod session;

pub use extract::extract_fields;
pub use intent::{CallDomain, Classification, Intent, Priority};
pub use replies::{
    apology_reply, fallback_reply, financial_confirmation, question_for, reprompt,
    reservation_confirmation,
};
pub use rules::{classify_rule_based, priority_for};
pub use session::{checklist, CallSession, FieldSet, FIELD_PRIORITY};
