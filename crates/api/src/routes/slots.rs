use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/slots", post(handlers::slots::publish_slots))
        .route(
            "/api/admin/slots/preview",
            post(handlers::slots::preview_slots),
        )
        .route("/api/slots/:date", get(handlers::slots::get_day_slots))
}
