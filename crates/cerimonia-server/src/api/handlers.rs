//! HTTP request handlers.
//!
//! Handlers stay thin: input is validated into core types, the core services do the
//! work, and `ApiError` maps failures to status codes.

use super::types::{
    AttendeeResponse, EventResponse, EventsResponse, ExistsResponse, HealthResponse,
    OptinRequest, OptinResponse, OptinsResponse, SignupRequest,
};
use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cerimonia_core::{cpf, Cpf, FlowError, NewAttendee};
use tracing::info;

/// Health check endpoint.
///
/// Always answers 200; `backend_healthy` reports whether the data backend responded.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: state.backend.name().to_string(),
        backend_healthy: state.backend.health_check().await,
    })
}

/// List events, latest first.
pub async fn list_events(State(state): State<AppState>) -> Result<Json<EventsResponse>, ApiError> {
    let events: Vec<EventResponse> = state
        .stores
        .events
        .list()
        .await?
        .into_iter()
        .map(EventResponse::from)
        .collect();

    let total = events.len();
    Ok(Json(EventsResponse { events, total }))
}

/// Get one event.
///
/// Returns 404 if the event does not exist.
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .stores
        .events
        .find_by_id(&event_id)
        .await?
        .ok_or(FlowError::EventNotFound(event_id))?;

    Ok(Json(event.into()))
}

/// Check whether an attendee exists for a CPF.
///
/// Never fails: an incomplete CPF answers `unknown`, and a failed lookup answers
/// `not_found` so the PWA offers signup.
pub async fn check_cpf(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Json<ExistsResponse> {
    // Incomplete input is answered without touching the store
    let status = state.resolver.check(&raw).await;

    Json(ExistsResponse {
        cpf: cpf::format(&raw),
        status,
    })
}

/// Create an attendee.
///
/// Returns 201 with the stored attendee. An already registered CPF is rejected with
/// 409 `CPF_ALREADY_REGISTERED`; the PWA sends the user back to the lookup.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AttendeeResponse>), ApiError> {
    // Validate the form before any store access
    let form = NewAttendee::new(&request.cpf, &request.full_name, request.email.as_deref())?;
    info!(cpf = %form.cpf, "Signup request received");

    // Create the attendee (uniqueness enforced by the store)
    let attendee = state.signup.sign_up(form).await?;

    Ok((StatusCode::CREATED, Json(attendee.into())))
}

/// Opt an existing attendee into an event.
///
/// A repeated opt-in is not an error: it answers 200 with `already_registered`, and
/// both outcomes carry the event's PIX key for payment.
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(request): Json<OptinRequest>,
) -> Result<Json<OptinResponse>, ApiError> {
    let cpf = Cpf::parse(&request.cpf)?;
    info!(%event_id, cpf = %cpf, "Opt-in request received");

    // Event must exist
    let event = state
        .stores
        .events
        .find_by_id(&event_id)
        .await?
        .ok_or_else(|| FlowError::EventNotFound(event_id.clone()))?;

    // Register, or report the existing registration
    let outcome = state.optins.register(&event.id, &cpf).await?;
    let notice = outcome.notice();

    Ok(Json(OptinResponse {
        event_id: event.id,
        status: notice,
        message: notice.message().to_string(),
        pix_key: event.pix_key,
    }))
}

/// Guest list of an event, oldest opt-in first.
pub async fn list_optins(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<OptinsResponse>, ApiError> {
    // Distinguish an unknown event from an empty guest list
    if state.stores.events.find_by_id(&event_id).await?.is_none() {
        return Err(FlowError::EventNotFound(event_id).into());
    }

    let optins = state.stores.optins.list_for_event(&event_id).await?;
    let total = optins.len();
    Ok(Json(OptinsResponse { optins, total }))
}
