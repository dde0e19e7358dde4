// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the gateway.

pub mod http;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum `Router` with all gateway routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(http::health))
        // OAuth handshake
        .route("/xero/auth/authorize", get(http::authorize))
        .route("/xero/auth/callback", get(http::callback))
        .route("/xero/auth/status", get(http::connection_status))
        .route("/xero/auth/disconnect", get(http::disconnect).post(http::disconnect))
        // Token-gated fetches
        .route("/xero/vendors", get(http::vendors))
        .route("/xero/accounts", get(http::accounts))
        // Local snapshots (no token)
        .route("/xero/local/vendors", get(http::local_vendors))
        .route("/xero/local/accounts", get(http::local_accounts))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
