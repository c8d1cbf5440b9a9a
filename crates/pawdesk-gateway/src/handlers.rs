// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handlers for the booking REST API.
//!
//! Handlers stay thin: decode the request, call the engine, map the domain
//! error onto an HTTP status. Everything business-level lives in
//! `pawdesk-engine`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use pawdesk_core::PawdeskError;
use pawdesk_core::types::{ReservationKind, TransitionAction};
use pawdesk_engine::{CreateReservationRequest, ListStatus};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

/// Request body for POST /v1/reservations/{id}/transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Lifecycle action to apply.
    pub action: TransitionAction,
    /// Staff note recorded alongside a confirmation.
    #[serde(default)]
    pub store_note: Option<String>,
}

/// Request body for POST /v1/reservations/{id}/store-note.
#[derive(Debug, Deserialize)]
pub struct StoreNoteRequest {
    pub store_note: String,
}

/// Request body for POST /v1/orders/{order_id}/blacklist.
#[derive(Debug, Deserialize)]
pub struct BlacklistRequest {
    pub blacklist: bool,
}

/// Which resource GET /v1/availability is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Grooming,
    Boarding,
}

/// Query parameters for GET /v1/availability.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub store: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub resource: ResourceKind,
}

/// Query parameters for GET /v1/stores/{store}/reservations.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: ListStatus,
    #[serde(default)]
    pub kind: Option<ReservationKind>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Query parameters for GET /v1/stores/{store}/risk.
#[derive(Debug, Deserialize)]
pub struct RiskQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Response body for GET /v1/stores/{store}/reservations.
#[derive(Debug, Serialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<pawdesk_core::types::Reservation>,
}

/// Response body for GET /v1/stores/{store}/risk.
#[derive(Debug, Serialize)]
pub struct RiskListResponse {
    pub reservations: Vec<pawdesk_storage::models::RiskReservation>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Seconds since the gateway state was created.
    pub uptime_secs: u64,
}

/// Body returned alongside every non-2xx status.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /v1/reservations
///
/// Books a grooming appointment or boarding stay; the payload is dispatched
/// on its `kind` tag.
pub async fn post_reservation(
    State(state): State<GatewayState>,
    Json(request): Json<CreateReservationRequest>,
) -> Response {
    match state.engine.create_reservation(request).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /v1/reservations/{id}
///
/// The staff detail view: the reservation, its order when completed, and the
/// customer's previous finished visits at the store.
pub async fn get_reservation(State(state): State<GatewayState>, Path(id): Path<String>) -> Response {
    match state.engine.reservation_details(&id).await {
        Ok(details) => Json(details).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /v1/reservations/{id}/transition
pub async fn post_transition(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(request): Json<TransitionRequest>,
) -> Response {
    match state
        .engine
        .transition(&id, request.action, request.store_note)
        .await
    {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /v1/reservations/{id}/store-note
pub async fn post_store_note(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(request): Json<StoreNoteRequest>,
) -> Response {
    match state.engine.update_store_note(&id, &request.store_note).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /v1/availability?store=...&date=...&resource=grooming|boarding
///
/// The response shape depends on `resource`: occupied time markers for
/// grooming, per-room-type occupancy for boarding.
pub async fn get_availability(
    State(state): State<GatewayState>,
    Query(query): Query<AvailabilityQuery>,
) -> Response {
    let result = match query.resource {
        ResourceKind::Grooming => state
            .engine
            .grooming_availability(&query.store, query.date)
            .await
            .map(|view| Json(view).into_response()),
        ResourceKind::Boarding => state
            .engine
            .boarding_availability(&query.store, query.date)
            .await
            .map(|view| Json(view).into_response()),
    };
    result.unwrap_or_else(error_response)
}

/// GET /v1/stores/{store}/reservations?status=...&kind=...&limit=...
pub async fn get_store_reservations(
    State(state): State<GatewayState>,
    Path(store): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    match state
        .engine
        .list_reservations(&store, query.status, query.kind, query.limit)
        .await
    {
        Ok(reservations) => Json(ReservationListResponse { reservations }).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /v1/stores/{store}/risk?limit=...
pub async fn get_store_risk(
    State(state): State<GatewayState>,
    Path(store): Path<String>,
    Query(query): Query<RiskQuery>,
) -> Response {
    match state.engine.risk_reservations(&store, query.limit).await {
        Ok(reservations) => Json(RiskListResponse { reservations }).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /v1/orders/{order_id}/blacklist
pub async fn post_order_blacklist(
    State(state): State<GatewayState>,
    Path(order_id): Path<i64>,
    Json(request): Json<BlacklistRequest>,
) -> Response {
    match state.engine.set_order_blacklist(order_id, request.blacklist).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /v1/coupons/remaining
pub async fn get_coupon_pool(State(state): State<GatewayState>) -> Response {
    match state.engine.coupon_pool().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(e),
    }
}

/// Map a domain error onto the HTTP surface.
///
/// Infrastructure failures are logged here and returned as an opaque 500;
/// everything else carries its display message to the caller.
fn error_response(err: PawdeskError) -> Response {
    let status = match &err {
        PawdeskError::NotFound { .. } => StatusCode::NOT_FOUND,
        PawdeskError::SlotConflict { .. } => StatusCode::CONFLICT,
        PawdeskError::Validation { .. }
        | PawdeskError::InvalidTransition { .. }
        | PawdeskError::AmbiguousMatch { .. } => StatusCode::BAD_REQUEST,
        PawdeskError::Config(_) | PawdeskError::Storage { .. } | PawdeskError::Internal(_) => {
            tracing::error!(error = %err, "request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal error".to_string(),
                }),
            )
                .into_response();
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}
