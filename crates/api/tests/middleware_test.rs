mod test_utils;

use axum::{body::to_bytes, http::StatusCode};
use pairslot_api::middleware::error_handling::map_error;
use pairslot_core::errors::BookingError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use test_utils::{TestContext, as_user};

#[rstest]
#[case(BookingError::NotFound("missing".into()), StatusCode::NOT_FOUND)]
#[case(BookingError::Validation("bad input".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Conflict("taken".into()), StatusCode::CONFLICT)]
#[case(BookingError::Forbidden("not yours".into()), StatusCode::FORBIDDEN)]
#[case(BookingError::Authentication("who are you".into()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::Database(eyre::eyre!("connection reset")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    BookingError::Internal(Box::new(std::io::Error::other("boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(BookingError::Conflict("Slot already claimed".to_string()));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body, json!({ "error": "Conflict: Slot already claimed" }));
}

#[tokio::test]
async fn test_missing_caller_header_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/pair-slots/approved").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Authentication error: Missing X-User-Id header" })
    );
}

#[tokio::test]
async fn test_malformed_caller_header_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .get("/api/pair-slots/pending/sent")
        .add_header(
            axum::http::HeaderName::from_static("x-user-id"),
            axum::http::HeaderValue::from_static("not-a-uuid"),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_caller_header_is_accepted() {
    let ctx = TestContext::new();

    let response = as_user(ctx.server.get("/api/pair-slots/approved"), Uuid::new_v4()).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_health_and_version() {
    let ctx = TestContext::new();

    let health = ctx.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

    let version = ctx.server.get("/version").await.json::<Value>();
    assert_eq!(version["name"], "pairslot-api");
    assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));
}
