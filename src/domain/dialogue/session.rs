//! Per-call session state: the slots collected so far.
//!
//! The session is the only carrier of state between the otherwise
//! stateless turns of a call. It is keyed by `call_id`, mutated once per
//! turn by the dialogue manager, and persisted through the session store
//! with an optimistic version.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::intent::{CallDomain, Priority};
use crate::domain::foundation::{CallId, Timestamp};

/// Field name -> field value slots collected during a call.
pub type FieldSet = BTreeMap<String, String>;

/// The one field exempt from first-value-wins: it may escalate.
pub const FIELD_PRIORITY: &str = "priority";

const RESERVATION_CHECKLIST: &[&str] = &["name", "phone", "date", "time", "party_size"];
const INQUIRY_CHECKLIST: &[&str] = &["name", "phone", "reason"];

/// Returns the ordered required-field checklist for a domain.
///
/// Order matters: the first missing field in this list is the one asked
/// for next.
pub fn checklist(domain: CallDomain) -> &'static [&'static str] {
    match domain {
        CallDomain::Restaurant => RESERVATION_CHECKLIST,
        CallDomain::Financial => INQUIRY_CHECKLIST,
    }
}

/// State for one call, resumable across stateless turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSession {
    call_id: CallId,
    domain: CallDomain,
    fields: FieldSet,
    version: u64,
    updated_at: Timestamp,
}

impl CallSession {
    /// Creates a fresh session with no fields at version 0.
    pub fn new(call_id: CallId, domain: CallDomain) -> Self {
        Self {
            call_id,
            domain,
            fields: FieldSet::new(),
            version: 0,
            updated_at: Timestamp::now(),
        }
    }

    /// Reconstructs a session from stored state.
    pub fn restore(
        call_id: CallId,
        domain: CallDomain,
        fields: FieldSet,
        version: u64,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            call_id,
            domain,
            fields,
            version,
            updated_at,
        }
    }

    pub fn call_id(&self) -> &CallId {
        &self.call_id
    }

    pub fn domain(&self) -> CallDomain {
        self.domain
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Returns a field value if present and non-empty.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Optimistic concurrency token; 0 until first persisted.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Current follow-up priority, defaulting to `Medium` when unset.
    pub fn priority(&self) -> Priority {
        self.field(FIELD_PRIORITY)
            .map(Priority::from_label)
            .unwrap_or(Priority::Medium)
    }

    /// Merges recognized values into the session.
    ///
    /// First value wins: a non-empty existing field is never replaced.
    /// `priority` alone may change, and only upward.
    pub fn merge_fields(&mut self, incoming: &FieldSet) {
        for (name, value) in incoming {
            if value.trim().is_empty() {
                continue;
            }
            if name == FIELD_PRIORITY {
                let next = match self.field(FIELD_PRIORITY) {
                    Some(current) => Priority::from_label(current)
                        .escalate(Priority::from_label(value)),
                    None => Priority::from_label(value),
                };
                self.fields
                    .insert(FIELD_PRIORITY.to_string(), next.as_str().to_string());
            } else if self.field(name).is_none() {
                self.fields.insert(name.clone(), value.clone());
            }
        }
        self.touch();
    }

    /// Records a mutation time without changing fields.
    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    /// Missing checklist fields, in checklist order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        checklist(self.domain)
            .iter()
            .copied()
            .filter(|name| self.field(name).is_none())
            .collect()
    }

    /// The single field to ask for next, if any.
    pub fn first_missing(&self) -> Option<&'static str> {
        checklist(self.domain)
            .iter()
            .copied()
            .find(|name| self.field(name).is_none())
    }

    /// True once every checklist field is present.
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }
}
