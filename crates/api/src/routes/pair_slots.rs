use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers::pair_slots};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/pair-slots", post(pair_slots::request_pair_slot))
        .route(
            "/api/pair-slots/available",
            get(pair_slots::available_pair_slots),
        )
        .route(
            "/api/pair-slots/approved",
            get(pair_slots::approved_pair_slots),
        )
        .route(
            "/api/pair-slots/pending/sent",
            get(pair_slots::pending_sent_pair_slots),
        )
        .route(
            "/api/pair-slots/pending/received",
            get(pair_slots::pending_received_pair_slots),
        )
        .route("/api/pair-slots/:id", delete(pair_slots::cancel_pair_slot))
        .route(
            "/api/pair-slots/:id/approve",
            post(pair_slots::approve_pair_slot),
        )
}
