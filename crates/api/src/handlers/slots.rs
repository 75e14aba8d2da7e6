use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use pairslot_core::{
    models::{DaySlotSet, PreviewSlotsResponse, PublishSlotsRequest},
    slots,
};
use std::sync::Arc;

use crate::{ApiState, middleware::error_handling::AppError};

/// Generates and stores the slots for a day, replacing any earlier set.
#[axum::debug_handler]
pub async fn publish_slots(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<PublishSlotsRequest>,
) -> Result<(StatusCode, Json<DaySlotSet>), AppError> {
    let day = state
        .service
        .publish_day(
            payload.date,
            &payload.start_time,
            &payload.end_time,
            payload.duration,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(day)))
}

#[axum::debug_handler]
pub async fn preview_slots(
    Json(payload): Json<PublishSlotsRequest>,
) -> Result<Json<PreviewSlotsResponse>, AppError> {
    let slots = slots::generate_from_input(&payload.start_time, &payload.end_time, payload.duration)?;

    Ok(Json(PreviewSlotsResponse { slots }))
}

#[axum::debug_handler]
pub async fn get_day_slots(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DaySlotSet>, AppError> {
    Ok(Json(state.service.day_slots(date).await?))
}
