//! # Caller Identity
//!
//! Booking routes act on behalf of the user named in the `X-User-Id` header.
//! [`CallerId`] extracts and validates it; a missing or malformed header is
//! rejected with `401 Unauthorized` before the handler runs.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use pairslot_core::errors::BookingError;
use uuid::Uuid;

use super::error_handling::AppError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller of a request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CallerId(user_id): CallerId) -> String {
///     user_id.to_string()
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(USER_ID_HEADER).ok_or_else(|| {
            AppError(BookingError::Authentication(
                "Missing X-User-Id header".to_string(),
            ))
        })?;

        value
            .to_str()
            .ok()
            .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
            .map(CallerId)
            .ok_or_else(|| {
                AppError(BookingError::Authentication(
                    "X-User-Id header is not a valid user id".to_string(),
                ))
            })
    }
}
