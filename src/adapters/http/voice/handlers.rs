//! HTTP handlers for the voice endpoints.
//!
//! These handlers connect Axum routes to the application layer. The turn
//! handlers never return errors to the transport: a failed turn already
//! carries its apology inside the reply.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    GreetCallCommand, GreetCallHandler, ProcessTurnHandler, TurnCommand,
};
use crate::domain::dialogue::CallDomain;
use crate::ports::RecordStore;

use super::dto::{
    ErrorResponse, HealthResponse, InquiriesResponse, InquiryView, OpenCallRequest,
    ReservationView, ReservationsResponse, StatsResponse, TurnRequest, TurnResponse,
};

/// Most recent records returned by the admin listings.
const ADMIN_LISTING_LIMIT: u32 = 50;

/// Shared application state for voice handlers.
#[derive(Clone)]
pub struct VoiceAppState {
    pub turns: Arc<ProcessTurnHandler>,
    pub greetings: Arc<GreetCallHandler>,
    pub records: Arc<dyn RecordStore>,
    /// Business names echoed by the health endpoint.
    pub restaurant_name: String,
    pub financial_name: String,
}

impl VoiceAppState {
    /// Creates a new VoiceAppState.
    pub fn new(
        turns: Arc<ProcessTurnHandler>,
        greetings: Arc<GreetCallHandler>,
        records: Arc<dyn RecordStore>,
        restaurant_name: impl Into<String>,
        financial_name: impl Into<String>,
    ) -> Self {
        Self {
            turns,
            greetings,
            records,
            restaurant_name: restaurant_name.into(),
            financial_name: financial_name.into(),
        }
    }
}

/// POST /voice/{domain}/open - greet a newly connected call.
///
/// # Errors
/// - 400 Bad Request: unknown domain segment
pub async fn open_call(
    State(state): State<VoiceAppState>,
    Path(domain): Path<String>,
    Json(request): Json<OpenCallRequest>,
) -> Result<impl IntoResponse, VoiceApiError> {
    let domain = parse_domain(&domain)?;

    let reply = state.greetings.handle(&GreetCallCommand {
        call_id: request.call_id,
        domain,
    });

    Ok((StatusCode::OK, Json(TurnResponse::from(reply))))
}

/// POST /voice/{domain}/turn - process one caller utterance.
///
/// # Errors
/// - 400 Bad Request: unknown domain segment
pub async fn process_turn(
    State(state): State<VoiceAppState>,
    Path(domain): Path<String>,
    Json(request): Json<TurnRequest>,
) -> Result<impl IntoResponse, VoiceApiError> {
    let domain = parse_domain(&domain)?;

    let reply = state
        .turns
        .handle(TurnCommand {
            call_id: request.call_id,
            domain,
            utterance: request.utterance,
        })
        .await;

    Ok((StatusCode::OK, Json(TurnResponse::from(reply))))
}

/// GET /admin/reservations - most recent reservations.
pub async fn list_reservations(
    State(state): State<VoiceAppState>,
) -> Result<impl IntoResponse, VoiceApiError> {
    let reservations = state
        .records
        .recent_reservations(ADMIN_LISTING_LIMIT)
        .await
        .map_err(|e| VoiceApiError::Internal(e.to_string()))?;

    let views: Vec<ReservationView> = reservations.iter().map(ReservationView::from).collect();
    Ok((
        StatusCode::OK,
        Json(ReservationsResponse {
            total: views.len(),
            reservations: views,
        }),
    ))
}

/// GET /admin/inquiries - most recent financial inquiries.
pub async fn list_inquiries(
    State(state): State<VoiceAppState>,
) -> Result<impl IntoResponse, VoiceApiError> {
    let inquiries = state
        .records
        .recent_inquiries(ADMIN_LISTING_LIMIT)
        .await
        .map_err(|e| VoiceApiError::Internal(e.to_string()))?;

    let views: Vec<InquiryView> = inquiries.iter().map(InquiryView::from).collect();
    Ok((
        StatusCode::OK,
        Json(InquiriesResponse {
            total: views.len(),
            inquiries: views,
        }),
    ))
}

/// GET /admin/stats - record totals.
pub async fn stats(
    State(state): State<VoiceAppState>,
) -> Result<impl IntoResponse, VoiceApiError> {
    let counts = state
        .records
        .counts()
        .await
        .map_err(|e| VoiceApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(StatsResponse {
            total_reservations: counts.reservations,
            total_inquiries: counts.inquiries,
            system_status: "operational",
            version: env!("CARGO_PKG_VERSION"),
        }),
    ))
}

/// GET /health - liveness probe with deployment facts.
pub async fn health(State(state): State<VoiceAppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            service: "voiceline",
            version: env!("CARGO_PKG_VERSION"),
            restaurant: state.restaurant_name,
            financial: state.financial_name,
        }),
    )
}

fn parse_domain(segment: &str) -> Result<CallDomain, VoiceApiError> {
    segment
        .parse()
        .map_err(|_| VoiceApiError::BadRequest(format!("unknown domain '{}'", segment)))
}

/// API-level errors mapped onto HTTP statuses.
#[derive(Debug)]
pub enum VoiceApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for VoiceApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            VoiceApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            VoiceApiError::Internal(message) => {
                tracing::error!(error = %message, "admin endpoint failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
