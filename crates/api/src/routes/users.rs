use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/users", post(handlers::users::register_user))
        .route(
            "/api/users/me/device-token",
            put(handlers::users::update_device_token),
        )
        .route("/api/users/:id", get(handlers::users::get_user))
}
