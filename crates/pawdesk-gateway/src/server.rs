// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The axum server: routes, middleware, shared state, and the listen
//! loop with graceful shutdown.

use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use pawdesk_core::PawdeskError;
use pawdesk_engine::Engine;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// State cloned into every request handler.
#[derive(Clone)]
pub struct GatewayState {
    /// Booking engine every handler dispatches into.
    pub engine: Engine,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
        }
    }
}

/// Bind address for the gateway.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the gateway router.
///
/// Routes:
/// - GET  /health
/// - POST /v1/reservations
/// - GET  /v1/reservations/{id}
/// - POST /v1/reservations/{id}/transition
/// - POST /v1/reservations/{id}/store-note
/// - GET  /v1/availability
/// - GET  /v1/stores/{store}/reservations
/// - GET  /v1/stores/{store}/risk
/// - POST /v1/orders/{order_id}/blacklist
/// - GET  /v1/coupons/remaining
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/reservations", post(handlers::post_reservation))
        .route("/v1/reservations/{id}", get(handlers::get_reservation))
        .route(
            "/v1/reservations/{id}/transition",
            post(handlers::post_transition),
        )
        .route(
            "/v1/reservations/{id}/store-note",
            post(handlers::post_store_note),
        )
        .route("/v1/availability", get(handlers::get_availability))
        .route(
            "/v1/stores/{store}/reservations",
            get(handlers::get_store_reservations),
        )
        .route("/v1/stores/{store}/risk", get(handlers::get_store_risk))
        .route(
            "/v1/orders/{order_id}/blacklist",
            post(handlers::post_order_blacklist),
        )
        .route("/v1/coupons/remaining", get(handlers::get_coupon_pool))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind to the configured host:port and serve until SIGINT.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), PawdeskError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PawdeskError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PawdeskError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug_names_the_bind_address() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 7420,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("7420"));
    }
}
