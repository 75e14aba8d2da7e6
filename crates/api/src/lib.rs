//! # PairSlot API
//!
//! The API crate provides the web server for the pair-slot booking service. It
//! exposes the admin slot publishing endpoints, user profiles and the pair booking
//! workflow over JSON.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into [`PairSlotService`] calls
//! - **Middleware**: Caller identity and error mapping
//! - **Config**: Environment driven server settings
//!
//! Callers identify themselves with the `X-User-Id` header; see
//! [`middleware::auth::CallerId`].

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Caller identity extraction and error responses
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
};
use eyre::Result;
use pairslot_core::PairSlotService;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::middleware::auth::USER_ID_HEADER;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Booking engine with its stores and notification sender
    pub service: PairSlotService,
}

impl ApiState {
    pub fn new(service: PairSlotService) -> Arc<Self> {
        Arc::new(Self { service })
    }
}

/// Builds the router with every endpoint and request tracing.
///
/// CORS and the request timeout are added by [`start_server`], so tests can drive
/// this router directly.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Admin slot publishing and the public day view
        .merge(routes::slots::routes())
        // User profiles and device tokens
        .merge(routes::users::routes())
        // Pair booking workflow
        .merge(routes::pair_slots::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_origin(origins)
}

/// Starts the API server with the provided configuration and booking service.
///
/// Expects the tracing subscriber to be installed by the binary.
///
/// # Example
///
/// ```rust,ignore
/// let config = ApiConfig::from_env()?;
/// let service = PairSlotService::new(Arc::new(InMemoryStore::new()), notifier, config.approval_policy());
/// start_server(config, service).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, service: PairSlotService) -> Result<()> {
    let app = router(ApiState::new(service));

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(|_: BoxError| async {
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
