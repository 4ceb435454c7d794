//! Session and record store adapters.

mod in_memory;
mod postgres;

pub use in_memory::{InMemoryRecordStore, InMemorySessionStore};
pub use postgres::{ensure_schema, PostgresRecordStore, PostgresSessionStore};
