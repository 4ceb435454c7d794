//! PostgreSQL session and record stores.
//!
//! Sessions carry a `version` column; the versioned put is a conditional
//! INSERT/UPDATE so a lost race surfaces as zero affected rows, never as a
//! silent overwrite. Records enforce once-per-call with a unique `call_id`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::dialogue::{CallDomain, CallSession, FieldSet, Priority};
use crate::domain::foundation::{
    CallId, DomainError, ErrorCode, InquiryId, ReservationId, Timestamp,
};
use crate::domain::records::{Inquiry, Record, Reservation, ReservationStatus};
use crate::ports::{PutOutcome, RecordCounts, RecordStore, SessionStore};

/// Creates the voiceline tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS call_sessions (
            call_id TEXT PRIMARY KEY,
            domain TEXT NOT NULL,
            fields TEXT NOT NULL,
            version BIGINT NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            id UUID PRIMARY KEY,
            call_id TEXT NOT NULL UNIQUE,
            customer_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT,
            reservation_date TEXT NOT NULL,
            reservation_time TEXT NOT NULL,
            party_size INT NOT NULL,
            status TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS inquiries (
            id UUID PRIMARY KEY,
            call_id TEXT NOT NULL UNIQUE,
            customer_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT,
            reason TEXT NOT NULL,
            priority TEXT NOT NULL,
            call_time TIMESTAMPTZ NOT NULL,
            follow_up_completed BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to create schema: {}", e)))?;
    }

    Ok(())
}

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn get(&self, call_id: &CallId) -> Result<Option<CallSession>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT domain, fields, version, updated_at
            FROM call_sessions
            WHERE call_id = $1
            "#,
        )
        .bind(call_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch session: {}", e)))?;

        match row {
            Some(row) => {
                let domain: String = row.get("domain");
                let domain: CallDomain = domain
                    .parse()
                    .map_err(|e: String| DomainError::internal(e))?;

                let fields_json: String = row.get("fields");
                let fields: FieldSet = serde_json::from_str(&fields_json).map_err(|e| {
                    DomainError::internal(format!("corrupt session fields: {}", e))
                })?;

                let version: i64 = row.get("version");
                let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

                Ok(Some(CallSession::restore(
                    call_id.clone(),
                    domain,
                    fields,
                    version as u64,
                    Timestamp::from_datetime(updated_at),
                )))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        session: &CallSession,
        expected_version: u64,
    ) -> Result<PutOutcome, DomainError> {
        let fields_json = serde_json::to_string(session.fields())
            .map_err(|e| DomainError::internal(format!("Failed to encode fields: {}", e)))?;

        let affected = if expected_version == 0 {
            sqlx::query(
                r#"
                INSERT INTO call_sessions (call_id, domain, fields, version, updated_at)
                VALUES ($1, $2, $3, 1, $4)
                ON CONFLICT (call_id) DO NOTHING
                "#,
            )
            .bind(session.call_id().as_str())
            .bind(session.domain().as_str())
            .bind(&fields_json)
            .bind(session.updated_at().as_datetime())
            .execute(&self.pool)
            .await
        } else {
            sqlx::query(
                r#"
                UPDATE call_sessions SET
                    fields = $2,
                    version = version + 1,
                    updated_at = $3
                WHERE call_id = $1 AND version = $4
                "#,
            )
            .bind(session.call_id().as_str())
            .bind(&fields_json)
            .bind(session.updated_at().as_datetime())
            .bind(expected_version as i64)
            .execute(&self.pool)
            .await
        }
        .map_err(|e| DomainError::database(format!("Failed to persist session: {}", e)))?;

        if affected.rows_affected() == 0 {
            Ok(PutOutcome::Conflict)
        } else {
            Ok(PutOutcome::Committed {
                version: expected_version + 1,
            })
        }
    }
}

/// PostgreSQL implementation of RecordStore.
#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a new PostgresRecordStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn find_by_call(&self, call_id: &CallId) -> Result<Option<Record>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, customer_name, phone, email, reservation_date,
                   reservation_time, party_size, status, created_at
            FROM reservations
            WHERE call_id = $1
            "#,
        )
        .bind(call_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch reservation: {}", e)))?;

        if let Some(row) = row {
            return Ok(Some(Record::Reservation(row_to_reservation(&row)?)));
        }

        let row = sqlx::query(
            r#"
            SELECT id, customer_name, phone, email, reason, priority,
                   call_time, follow_up_completed
            FROM inquiries
            WHERE call_id = $1
            "#,
        )
        .bind(call_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch inquiry: {}", e)))?;

        Ok(row.map(|row| row_to_inquiry(&row).map(Record::Inquiry)).transpose()?)
    }

    async fn insert(&self, call_id: &CallId, record: &Record) -> Result<(), DomainError> {
        let result = match record {
            Record::Reservation(r) => {
                sqlx::query(
                    r#"
                    INSERT INTO reservations (
                        id, call_id, customer_name, phone, email,
                        reservation_date, reservation_time, party_size, status, created_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(r.id.as_uuid())
                .bind(call_id.as_str())
                .bind(&r.name)
                .bind(&r.phone)
                .bind(&r.email)
                .bind(&r.date)
                .bind(&r.time)
                .bind(r.party_size as i32)
                .bind(r.status.as_str())
                .bind(r.created_at.as_datetime())
                .execute(&self.pool)
                .await
            }
            Record::Inquiry(i) => {
                sqlx::query(
                    r#"
                    INSERT INTO inquiries (
                        id, call_id, customer_name, phone, email,
                        reason, priority, call_time, follow_up_completed
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                    "#,
                )
                .bind(i.id.as_uuid())
                .bind(call_id.as_str())
                .bind(&i.name)
                .bind(&i.phone)
                .bind(&i.email)
                .bind(&i.reason)
                .bind(i.priority.as_str())
                .bind(i.call_time.as_datetime())
                .bind(i.follow_up_completed)
                .execute(&self.pool)
                .await
            }
        };

        result.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::new(
                    ErrorCode::RecordExists,
                    format!("record already finalized for call {}", call_id),
                )
            } else {
                DomainError::database(format!("Failed to insert record: {}", e))
            }
        })?;

        Ok(())
    }

    async fn recent_reservations(&self, limit: u32) -> Result<Vec<Reservation>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_name, phone, email, reservation_date,
                   reservation_time, party_size, status, created_at
            FROM reservations
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list reservations: {}", e)))?;

        rows.iter().map(row_to_reservation).collect()
    }

    async fn recent_inquiries(&self, limit: u32) -> Result<Vec<Inquiry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, customer_name, phone, email, reason, priority,
                   call_time, follow_up_completed
            FROM inquiries
            ORDER BY call_time DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list inquiries: {}", e)))?;

        rows.iter().map(row_to_inquiry).collect()
    }

    async fn counts(&self) -> Result<RecordCounts, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT (SELECT COUNT(*) FROM reservations) AS reservations,
                   (SELECT COUNT(*) FROM inquiries) AS inquiries
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to count records: {}", e)))?;

        let reservations: i64 = row.get("reservations");
        let inquiries: i64 = row.get("inquiries");

        Ok(RecordCounts {
            reservations: reservations as u64,
            inquiries: inquiries as u64,
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == "23505")
}

fn row_to_reservation(row: &sqlx::postgres::PgRow) -> Result<Reservation, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let status: String = row.get("status");
    let party_size: i32 = row.get("party_size");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    Ok(Reservation {
        id: ReservationId::from_uuid(id),
        name: row.get("customer_name"),
        phone: row.get("phone"),
        email: row.get("email"),
        date: row.get("reservation_date"),
        time: row.get("reservation_time"),
        party_size: party_size as u32,
        status: ReservationStatus::from_label(&status),
        created_at: Timestamp::from_datetime(created_at),
    })
}

fn row_to_inquiry(row: &sqlx::postgres::PgRow) -> Result<Inquiry, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let priority: String = row.get("priority");
    let call_time: chrono::DateTime<chrono::Utc> = row.get("call_time");

    Ok(Inquiry {
        id: InquiryId::from_uuid(id),
        name: row.get("customer_name"),
        phone: row.get("phone"),
        email: row.get("email"),
        reason: row.get("reason"),
        priority: Priority::from_label(&priority),
        call_time: Timestamp::from_datetime(call_time),
        follow_up_completed: row.get("follow_up_completed"),
    })
}
