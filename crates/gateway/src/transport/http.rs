// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers. The only layer that maps a [`GatewayError`] to a status.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{ErrorCode, GatewayError};
use crate::gateway::Fetched;
use crate::oauth::flow::CallbackParams;
use crate::state::AppState;

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CallbackErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub file_path: String,
}

#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct DisconnectResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatusResponse {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

/// `{success:false, error}` with the error's status.
fn failure(err: &GatewayError) -> Response {
    let body = FailureResponse { success: false, error: err.message.clone() };
    (err.status_code(), Json(body)).into_response()
}

fn fetch_response<T: Serialize>(result: Result<Fetched<T>, GatewayError>, what: &str) -> Response {
    match result {
        Ok(fetched) => Json(FetchResponse {
            success: true,
            data: fetched.data,
            file_path: fetched.storage_path,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(code = %e.code, err = %e.message, "failed to fetch {what}");
            failure(&e)
        }
    }
}

fn snapshot_response(result: Result<String, GatewayError>, what: &str) -> Response {
    match result {
        Ok(snapshot) => ([(CONTENT_TYPE, "application/json")], snapshot).into_response(),
        Err(e) if e.code == ErrorCode::NotFound => failure(&e),
        Err(e) => {
            tracing::error!(code = %e.code, err = %e.message, "failed to read local {what}");
            failure(&e)
        }
    }
}

// -- Handlers -----------------------------------------------------------------

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "running".to_owned() })
}

/// `GET /xero/auth/authorize`: 302 to Xero's consent screen.
pub async fn authorize(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = s.session(&headers);
    match s.flow.begin_authorization(&session) {
        Ok(url) => {
            (StatusCode::FOUND, [(LOCATION, url), (SET_COOKIE, session.cookie())]).into_response()
        }
        Err(e) => {
            tracing::error!(code = %e.code, err = %e.message, "failed to start xero authorization");
            let body = CallbackErrorResponse { error: e.message.clone(), details: None };
            (e.status_code(), Json(body)).into_response()
        }
    }
}

/// `GET /xero/auth/callback`: Xero redirects here with `code` and `state`.
pub async fn callback(
    State(s): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Response {
    let session = s.session(&headers);
    match s.flow.complete_authorization(&session, &params).await {
        Ok(_) => (
            [(SET_COOKIE, session.cookie())],
            Json(CallbackResponse { message: "Successfully authenticated with Xero".to_owned() }),
        )
            .into_response(),
        Err(e) => {
            if e.code != ErrorCode::InvalidState {
                tracing::error!(code = %e.code, err = %e.message, "xero callback failed");
            }
            let body = CallbackErrorResponse { error: e.message.clone(), details: e.details.clone() };
            (e.status_code(), Json(body)).into_response()
        }
    }
}

/// `GET /xero/auth/status`: whether a usable token is on file.
pub async fn connection_status(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = s.existing_session(&headers);
    match s.flow.tokens().resolve_active(session.as_ref()) {
        Ok(bundle) => Json(ConnectionStatusResponse {
            connected: true,
            tenant_id: Some(bundle.tenant_id),
            expires: Some(bundle.expires),
        })
        .into_response(),
        Err(e) if e.code == ErrorCode::TokenExpiredOrMissing => {
            Json(ConnectionStatusResponse { connected: false, tenant_id: None, expires: None })
                .into_response()
        }
        Err(e) => {
            tracing::error!(code = %e.code, err = %e.message, "failed to read xero token");
            failure(&e)
        }
    }
}

/// `GET|POST /xero/auth/disconnect`
pub async fn disconnect(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = s.existing_session(&headers);
    match s.flow.disconnect(session.as_ref()) {
        Ok(()) => Json(DisconnectResponse {
            success: true,
            message: "Disconnected from Xero".to_owned(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(code = %e.code, err = %e.message, "failed to disconnect xero");
            failure(&e)
        }
    }
}

/// `GET /xero/vendors`
pub async fn vendors(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = s.existing_session(&headers);
    fetch_response(s.gateway.fetch_vendors(session.as_ref()).await, "vendors")
}

/// `GET /xero/accounts`
pub async fn accounts(State(s): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = s.existing_session(&headers);
    fetch_response(s.gateway.fetch_accounts(session.as_ref()).await, "accounts")
}

/// `GET /xero/local/vendors`
pub async fn local_vendors(State(s): State<Arc<AppState>>) -> Response {
    snapshot_response(s.gateway.read_local_vendors(), "vendors")
}

/// `GET /xero/local/accounts`
pub async fn local_accounts(State(s): State<Arc<AppState>>) -> Response {
    snapshot_response(s.gateway.read_local_accounts(), "accounts")
}
