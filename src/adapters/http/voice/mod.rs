//! Voice endpoints: per-turn dialogue, call-open greetings, and the admin
//! read surface.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::VoiceAppState;
pub use routes::voice_router;
