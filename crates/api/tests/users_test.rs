mod test_utils;

use axum::http::StatusCode;
use pairslot_core::models::UserProfile;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use test_utils::{TestContext, as_user};

#[tokio::test]
async fn test_register_and_fetch_summary() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/users")
        .json(&json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "company": "Analytical Engines",
            "phone": "",
            "device_token": "device-ada"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let profile = response.json::<UserProfile>();
    assert_eq!(profile.phone, None);
    assert_eq!(profile.device_token.as_deref(), Some("device-ada"));

    let summary = ctx
        .server
        .get(&format!("/api/users/{}", profile.id))
        .await
        .json::<Value>();

    assert_eq!(
        summary,
        json!({
            "id": profile.id,
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "company": "Analytical Engines",
            "phone": null
        })
    );
}

#[tokio::test]
async fn test_register_with_id_replaces_profile() {
    let ctx = TestContext::new();
    let id = Uuid::new_v4();

    let first = ctx
        .server
        .post("/api/users")
        .json(&json!({ "id": id, "name": "Grace", "email": "grace@example.com" }))
        .await
        .json::<UserProfile>();
    let second = ctx
        .server
        .post("/api/users")
        .json(&json!({ "id": id, "name": "Grace Hopper", "email": "grace@example.com" }))
        .await
        .json::<UserProfile>();

    assert_eq!(second.id, id);
    assert_eq!(second.name, "Grace Hopper");
    assert_eq!(second.created_at, first.created_at);
}

#[tokio::test]
async fn test_register_validates_input() {
    let ctx = TestContext::new();

    let blank = ctx
        .server
        .post("/api/users")
        .json(&json!({ "name": "  ", "email": "someone@example.com" }))
        .await;
    assert_eq!(blank.status_code(), StatusCode::BAD_REQUEST);

    let bad_email = ctx
        .server
        .post("/api/users")
        .json(&json!({ "name": "Someone", "email": "not-an-email" }))
        .await;
    assert_eq!(bad_email.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let ctx = TestContext::new();

    let response = ctx.server.get(&format!("/api/users/{}", Uuid::new_v4())).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_device_token_set_and_clear() {
    let ctx = TestContext::new();
    let user = ctx.register().await;
    assert_eq!(user.device_token, None);

    let set = as_user(ctx.server.put("/api/users/me/device-token"), user.id)
        .json(&json!({ "device_token": "token-123" }))
        .await;
    assert_eq!(set.status_code(), StatusCode::OK);
    assert_eq!(
        set.json::<UserProfile>().device_token.as_deref(),
        Some("token-123")
    );

    let cleared = as_user(ctx.server.put("/api/users/me/device-token"), user.id)
        .json(&json!({ "device_token": null }))
        .await
        .json::<UserProfile>();
    assert_eq!(cleared.device_token, None);
}

#[tokio::test]
async fn test_device_token_requires_known_caller() {
    let ctx = TestContext::new();

    let anonymous = ctx
        .server
        .put("/api/users/me/device-token")
        .json(&json!({ "device_token": "token" }))
        .await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

    let unknown = as_user(ctx.server.put("/api/users/me/device-token"), Uuid::new_v4())
        .json(&json!({ "device_token": "token" }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);
}
