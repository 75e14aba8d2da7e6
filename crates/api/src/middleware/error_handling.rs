//! # Error Handling Middleware
//!
//! Maps [`BookingError`] to HTTP status codes and a JSON `{"error": message}`
//! body, so every endpoint reports failures the same way.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pairslot_core::errors::BookingError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(State(state): State<Arc<ApiState>>) -> Result<Json<DaySlotSet>, AppError> {
///     let day = state.service.day_slots(date).await?;
///     Ok(Json(day))
/// }
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::Forbidden(_) => StatusCode::FORBIDDEN,
            BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError straight to an HTTP response.
///
/// Handlers return `AppError` and never call this; it is the entry point for
/// code and tests that need the response for an error without a handler.
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
