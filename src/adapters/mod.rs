//! Adapters - concrete implementations of the ports.

pub mod ai;
pub mod http;
pub mod info;
pub mod notify;
pub mod store;
