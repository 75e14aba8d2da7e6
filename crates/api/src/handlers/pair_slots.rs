use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use pairslot_core::models::{
    AvailableSlotsQuery, BookingEntry, CancelPairSlotResponse, PairBooking, RequestPairSlotRequest,
    TimeSlot,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::{auth::CallerId, error_handling::AppError}};

#[axum::debug_handler]
pub async fn request_pair_slot(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
    Json(payload): Json<RequestPairSlotRequest>,
) -> Result<(StatusCode, Json<PairBooking>), AppError> {
    let booking = state
        .service
        .request_booking(payload.date, payload.slot_id, caller, payload.counterparty_id)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn approve_pair_slot(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<PairBooking>, AppError> {
    Ok(Json(state.service.approve_booking(id, caller).await?))
}

#[axum::debug_handler]
pub async fn cancel_pair_slot(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelPairSlotResponse>, AppError> {
    let booking = state.service.cancel_booking(id, caller).await?;

    Ok(Json(CancelPairSlotResponse {
        id: booking.id,
        cancelled: true,
    }))
}

/// Slots of the day that neither the caller nor the counterparty has claimed.
#[axum::debug_handler]
pub async fn available_pair_slots(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    let slots = state
        .service
        .available_slots(query.date, caller, query.counterparty_id)
        .await?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn approved_pair_slots(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
) -> Result<Json<Vec<BookingEntry>>, AppError> {
    Ok(Json(state.service.approved_bookings(caller).await?))
}

#[axum::debug_handler]
pub async fn pending_sent_pair_slots(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
) -> Result<Json<Vec<BookingEntry>>, AppError> {
    Ok(Json(state.service.pending_sent(caller).await?))
}

#[axum::debug_handler]
pub async fn pending_received_pair_slots(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
) -> Result<Json<Vec<BookingEntry>>, AppError> {
    Ok(Json(state.service.pending_received(caller).await?))
}
