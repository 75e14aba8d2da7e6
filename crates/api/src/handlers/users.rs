use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use pairslot_core::{
    errors::BookingError,
    models::{DeviceTokenRequest, RegisterUserRequest, UserProfile, UserSummary},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{ApiState, middleware::{auth::CallerId, error_handling::AppError}};

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Creates a profile, or replaces it when `id` names an existing user.
#[axum::debug_handler]
pub async fn register_user(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError(BookingError::Validation(
            "Name must not be empty".to_string(),
        )));
    }
    let email = payload.email.trim().to_string();
    if !email.contains('@') {
        return Err(AppError(BookingError::Validation(format!(
            "Invalid email address '{}'",
            email
        ))));
    }

    let users = state.service.users();
    let id = payload.id.unwrap_or_else(Uuid::new_v4);
    let created_at = match users.get_user(id).await? {
        Some(existing) => existing.created_at,
        None => Utc::now(),
    };

    let profile = users
        .upsert_user(UserProfile {
            id,
            name,
            email,
            company: non_empty(payload.company),
            phone: non_empty(payload.phone),
            device_token: non_empty(payload.device_token),
            created_at,
        })
        .await?;
    info!("Registered user {}", profile.id);

    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSummary>, AppError> {
    let profile = state
        .service
        .users()
        .get_user(id)
        .await?
        .ok_or_else(|| AppError(BookingError::NotFound(format!("User {} not found", id))))?;

    Ok(Json(UserSummary::from(&profile)))
}

/// Sets or clears (with `null` or an empty string) the caller's push token.
#[axum::debug_handler]
pub async fn update_device_token(
    State(state): State<Arc<ApiState>>,
    CallerId(caller): CallerId,
    Json(payload): Json<DeviceTokenRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .service
        .users()
        .set_device_token(caller, non_empty(payload.device_token))
        .await?
        .ok_or_else(|| AppError(BookingError::NotFound(format!("User {} not found", caller))))?;

    Ok(Json(profile))
}
