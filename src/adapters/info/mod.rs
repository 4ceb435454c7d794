//! Informational content adapters.

mod static_info;

pub use static_info::StaticBusinessInfo;
