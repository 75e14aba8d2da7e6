#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use chrono::NaiveDate;
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use pairslot_api::{ApiState, router};
use pairslot_core::{
    ApprovalPolicy, PairSlotService,
    models::{DaySlotSet, PairBooking, UserProfile},
    notify::LogSender,
    store::memory::InMemoryStore,
};
use serde_json::json;
use uuid::Uuid;

pub const DAY: &str = "2024-06-03";

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

/// Adds the caller identity header to a request.
pub fn as_user(request: TestRequest, user_id: Uuid) -> TestRequest {
    request.add_header(
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&user_id.to_string()).unwrap(),
    )
}

pub struct TestContext {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_policy(ApprovalPolicy::default())
    }

    pub fn with_policy(policy: ApprovalPolicy) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let service = PairSlotService::new(store.clone(), Arc::new(LogSender), policy);
        let server = TestServer::new(router(ApiState::new(service))).unwrap();

        Self { server, store }
    }

    /// Registers a user with generated details and returns the stored profile.
    pub async fn register(&self) -> UserProfile {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();

        self.server
            .post("/api/users")
            .json(&json!({ "name": name, "email": email }))
            .await
            .json::<UserProfile>()
    }

    /// Publishes 09:00-11:00 in 30 minute slots on [`DAY`].
    pub async fn publish(&self) -> DaySlotSet {
        self.server
            .post("/api/admin/slots")
            .json(&json!({
                "date": DAY,
                "start_time": "09:00",
                "end_time": "11:00",
                "duration": 30
            }))
            .await
            .json::<DaySlotSet>()
    }

    pub async fn request(&self, requester: Uuid, counterparty: Uuid, slot_id: u32) -> PairBooking {
        as_user(self.server.post("/api/pair-slots"), requester)
            .json(&json!({
                "date": DAY,
                "slot_id": slot_id,
                "counterparty_id": counterparty
            }))
            .await
            .json::<PairBooking>()
    }
}
