//! HTTP adapters.

pub mod voice;
