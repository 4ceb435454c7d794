//! Axum routes for the voice endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    health, list_inquiries, list_reservations, open_call, process_turn, stats, VoiceAppState,
};

/// Creates the full voiceline router.
///
/// Endpoints:
/// - POST /voice/{domain}/open - greet a newly connected call
/// - POST /voice/{domain}/turn - process one caller utterance
/// - GET  /admin/reservations  - most recent reservations
/// - GET  /admin/inquiries     - most recent inquiries
/// - GET  /admin/stats         - record totals
/// - GET  /health              - liveness probe
pub fn voice_router() -> Router<VoiceAppState> {
    Router::new()
        .route("/voice/:domain/open", post(open_call))
        .route("/voice/:domain/turn", post(process_turn))
        .route("/admin/reservations", get(list_reservations))
        .route("/admin/inquiries", get(list_inquiries))
        .route("/admin/stats", get(stats))
        .route("/health", get(health))
}
