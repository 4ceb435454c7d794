//! Application layer - use-case handlers orchestrating domain and ports.

pub mod handlers;
