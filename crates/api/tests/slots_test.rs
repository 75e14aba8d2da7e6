mod test_utils;

use axum::http::StatusCode;
use pairslot_core::models::{DaySlotSet, PreviewSlotsResponse};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use test_utils::{DAY, TestContext, day};

#[tokio::test]
async fn test_publish_creates_day() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/admin/slots")
        .json(&json!({
            "date": DAY,
            "start_time": "09:00",
            "end_time": "10:30",
            "duration": 30
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let published = response.json::<DaySlotSet>();
    assert_eq!(published.date, day());

    let windows: Vec<(String, String)> = published
        .slots
        .iter()
        .map(|slot| (slot.start_time.to_string(), slot.end_time.to_string()))
        .collect();
    assert_eq!(
        windows,
        vec![
            ("09:00".to_string(), "09:30".to_string()),
            ("09:30".to_string(), "10:00".to_string()),
            ("10:00".to_string(), "10:30".to_string()),
        ]
    );
    assert!(published.slots.iter().all(|slot| !slot.is_booked && !slot.is_approved));

    let fetched = ctx.server.get(&format!("/api/slots/{}", DAY)).await;
    assert_eq!(fetched.status_code(), StatusCode::OK);
    assert_eq!(fetched.json::<DaySlotSet>(), published);
}

#[tokio::test]
async fn test_republish_replaces_day() {
    let ctx = TestContext::new();
    let first = ctx.publish().await;

    let second = ctx
        .server
        .post("/api/admin/slots")
        .json(&json!({
            "date": DAY,
            "start_time": "13:00",
            "end_time": "14:00",
            "duration": 60
        }))
        .await
        .json::<DaySlotSet>();

    assert_ne!(first.generation, second.generation);
    let fetched = ctx.server.get(&format!("/api/slots/{}", DAY)).await.json::<DaySlotSet>();
    assert_eq!(fetched.slots.len(), 1);
    assert_eq!(fetched.generation, second.generation);
}

#[tokio::test]
async fn test_unpublished_day_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/slots/2024-06-04").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Resource not found: No slots published for 2024-06-04" })
    );
}

#[tokio::test]
async fn test_preview_does_not_store() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/admin/slots/preview")
        .json(&json!({
            "date": DAY,
            "start_time": "09:00",
            "end_time": "09:50",
            "duration": 30
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let preview = response.json::<PreviewSlotsResponse>();
    assert_eq!(preview.slots.len(), 2);
    assert_eq!(preview.slots[1].end_time.to_string(), "10:00");

    let fetched = ctx.server.get(&format!("/api/slots/{}", DAY)).await;
    assert_eq!(fetched.status_code(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("10:00", "09:00", 30)]
#[case("09:00", "09:00", 30)]
#[case("09:00", "11:00", 45)]
#[case("9am", "11:00", 30)]
#[case("09:00", "25:00", 30)]
#[tokio::test]
async fn test_publish_rejects_invalid_input(
    #[case] start_time: &str,
    #[case] end_time: &str,
    #[case] duration: u32,
) {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/admin/slots")
        .json(&json!({
            "date": DAY,
            "start_time": start_time,
            "end_time": end_time,
            "duration": duration
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let fetched = ctx.server.get(&format!("/api/slots/{}", DAY)).await;
    assert_eq!(fetched.status_code(), StatusCode::NOT_FOUND);
}
