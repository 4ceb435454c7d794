//! Session store port.
//!
//! The only carrier of state between the stateless turns of a call. The
//! versioned put realizes optimistic concurrency: a transport retry racing
//! the original request loses the race visibly instead of silently
//! clobbering fields.

use async_trait::async_trait;

use crate::domain::dialogue::CallSession;
use crate::domain::foundation::{CallId, DomainError};

/// Result of a versioned put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// The write was applied; the stored version is now `version`.
    Committed { version: u64 },
    /// Someone else committed first; reload and retry the merge.
    Conflict,
}

/// Port for durable per-call session state.
///
/// Implementations must make `put` atomic per `call_id`: the write only
/// applies when the stored version still equals `expected_version`
/// (`expected_version` 0 means "create; fail if the session already
/// exists"). Operations on different call ids must never block each other.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session for a call, if one exists.
    async fn get(&self, call_id: &CallId) -> Result<Option<CallSession>, DomainError>;

    /// Persist a session if the stored version still matches.
    ///
    /// Returns [`PutOutcome::Conflict`] on a version mismatch; the caller
    /// reloads and retries the merge once.
    async fn put(
        &self,
        session: &CallSession,
        expected_version: u64,
    ) -> Result<PutOutcome, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }

    #[test]
    fn put_outcome_carries_committed_version() {
        let outcome = PutOutcome::Committed { version: 3 };
        assert!(matches!(outcome, PutOutcome::Committed { version: 3 }));
        assert_ne!(outcome, PutOutcome::Conflict);
    }
}
