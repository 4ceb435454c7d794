//! In-memory session and record stores.
//!
//! The default stores for development and tests. Sessions honor the same
//! versioned compare-and-swap contract as the PostgreSQL adapter, so race
//! behavior is identical across both.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::CallSession;
use crate::domain::foundation::{CallId, DomainError, ErrorCode};
use crate::domain::records::{Inquiry, Record, Reservation};
use crate::ports::{PutOutcome, RecordCounts, RecordStore, SessionStore};

/// In-memory session store with versioned put.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<CallId, CallSession>>>,
}

impl InMemorySessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions (useful for tests).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, call_id: &CallId) -> Result<Option<CallSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(call_id).cloned())
    }

    async fn put(
        &self,
        session: &CallSession,
        expected_version: u64,
    ) -> Result<PutOutcome, DomainError> {
        let mut sessions = self.sessions.write().await;

        let stored_version = sessions.get(session.call_id()).map(CallSession::version);
        let matches = match stored_version {
            None => expected_version == 0,
            Some(stored) => stored == expected_version,
        };
        if !matches {
            return Ok(PutOutcome::Conflict);
        }

        let version = expected_version + 1;
        let committed = CallSession::restore(
            session.call_id().clone(),
            session.domain(),
            session.fields().clone(),
            version,
            session.updated_at(),
        );
        sessions.insert(session.call_id().clone(), committed);

        Ok(PutOutcome::Committed { version })
    }
}

/// In-memory append-only record store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<Vec<(CallId, Record)>>>,
}

impl InMemoryRecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (useful for tests).
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_by_call(&self, call_id: &CallId) -> Result<Option<Record>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|(id, _)| id == call_id)
            .map(|(_, record)| record.clone()))
    }

    async fn insert(&self, call_id: &CallId, record: &Record) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        if records.iter().any(|(id, _)| id == call_id) {
            return Err(DomainError::new(
                ErrorCode::RecordExists,
                format!("record already finalized for call {}", call_id),
            ));
        }
        records.push((call_id.clone(), record.clone()));
        Ok(())
    }

    async fn recent_reservations(&self, limit: u32) -> Result<Vec<Reservation>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter_map(|(_, record)| match record {
                Record::Reservation(r) => Some(r.clone()),
                Record::Inquiry(_) => None,
            })
            .take(limit as usize)
            .collect())
    }

    async fn recent_inquiries(&self, limit: u32) -> Result<Vec<Inquiry>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter_map(|(_, record)| match record {
                Record::Inquiry(i) => Some(i.clone()),
                Record::Reservation(_) => None,
            })
            .take(limit as usize)
            .collect())
    }

    async fn counts(&self) -> Result<RecordCounts, DomainError> {
        let records = self.records.read().await;
        let mut counts = RecordCounts::default();
        for (_, record) in records.iter() {
            match record {
                Record::Reservation(_) => counts.reservations += 1,
                Record::Inquiry(_) => counts.inquiries += 1,
            }
        }
        Ok(counts)
    }
}
