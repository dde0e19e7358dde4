// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: a mock Xero and state builders.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::config::{GatewayConfig, LogFormat};
use crate::state::AppState;
use crate::store::Stores;
use crate::xero::XeroEndpoints;

/// Canned replies served by [`MockXero`].
#[derive(Debug, Clone)]
pub struct MockReplies {
    pub token: (u16, serde_json::Value),
    pub connections: (u16, serde_json::Value),
    pub contacts: (u16, serde_json::Value),
    pub accounts: (u16, serde_json::Value),
}

impl Default for MockReplies {
    fn default() -> Self {
        Self {
            token: (
                200,
                serde_json::json!({
                    "access_token": "mock-access",
                    "refresh_token": "mock-refresh",
                    "expires_in": 1800,
                    "id_token": "mock-id",
                    "token_type": "Bearer"
                }),
            ),
            connections: (
                200,
                serde_json::json!([
                    { "id": "conn-1", "tenantId": "tenant-1", "tenantType": "ORGANISATION", "tenantName": "Demo Co" }
                ]),
            ),
            contacts: (
                200,
                serde_json::json!({
                    "Contacts": [
                        {
                            "ContactID": "v-1", "Name": "Paper Co", "ContactStatus": "ACTIVE", "IsSupplier": true,
                            "Balances": { "AccountsPayable": { "Outstanding": 100.0, "Overdue": 25.0 } }
                        },
                        { "ContactID": "c-1", "Name": "Customer Ltd", "ContactStatus": "ACTIVE", "IsSupplier": false },
                        { "ContactID": "v-2", "Name": "Ink Ltd", "ContactStatus": "ACTIVE", "IsSupplier": true }
                    ]
                }),
            ),
            accounts: (
                200,
                serde_json::json!({
                    "Accounts": [
                        { "AccountID": "a-1", "Code": "400", "Name": "Advertising", "Type": "EXPENSE", "Status": "ACTIVE", "Description": "Ads" },
                        { "AccountID": "a-2", "Code": "200", "Name": "Sales", "Type": "REVENUE", "Status": "ACTIVE" }
                    ]
                }),
            ),
        }
    }
}

#[derive(Default)]
struct MockShared {
    replies: Mutex<MockReplies>,
    token_calls: AtomicU32,
    accounting_calls: AtomicU32,
    last_tenant: Mutex<Option<String>>,
}

/// A local HTTP server impersonating Xero's identity and accounting APIs.
pub struct MockXero {
    pub addr: SocketAddr,
    shared: Arc<MockShared>,
}

impl MockXero {
    pub async fn spawn(replies: MockReplies) -> anyhow::Result<Self> {
        let shared =
            Arc::new(MockShared { replies: Mutex::new(replies), ..MockShared::default() });

        let app = Router::new()
            .route("/token", post(mock_token))
            .route("/connections", get(mock_connections))
            .route("/api.xro/2.0/Contacts", get(mock_contacts))
            .route("/api.xro/2.0/Accounts", get(mock_accounts))
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });
        Ok(Self { addr, shared })
    }

    pub fn endpoints(&self) -> XeroEndpoints {
        XeroEndpoints::at(&format!("http://{}", self.addr))
    }

    /// Replace the canned replies.
    pub fn set_replies(&self, replies: MockReplies) {
        *self.shared.replies.lock() = replies;
    }

    pub fn token_calls(&self) -> u32 {
        self.shared.token_calls.load(Ordering::Relaxed)
    }

    pub fn accounting_calls(&self) -> u32 {
        self.shared.accounting_calls.load(Ordering::Relaxed)
    }

    /// `Xero-tenant-id` of the last accounting call.
    pub fn last_tenant(&self) -> Option<String> {
        self.shared.last_tenant.lock().clone()
    }
}

fn reply((status, body): (u16, serde_json::Value)) -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), Json(body))
}

async fn mock_token(State(s): State<Arc<MockShared>>) -> (StatusCode, Json<serde_json::Value>) {
    s.token_calls.fetch_add(1, Ordering::Relaxed);
    let r = s.replies.lock().token.clone();
    reply(r)
}

async fn mock_connections(
    State(s): State<Arc<MockShared>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let r = s.replies.lock().connections.clone();
    reply(r)
}

fn record_accounting_call(s: &MockShared, headers: &HeaderMap) {
    s.accounting_calls.fetch_add(1, Ordering::Relaxed);
    *s.last_tenant.lock() =
        headers.get("xero-tenant-id").and_then(|v| v.to_str().ok()).map(str::to_owned);
}

async fn mock_contacts(
    State(s): State<Arc<MockShared>>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    record_accounting_call(&s, &headers);
    let r = s.replies.lock().contacts.clone();
    reply(r)
}

async fn mock_accounts(
    State(s): State<Arc<MockShared>>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    record_accounting_call(&s, &headers);
    let r = s.replies.lock().accounts.clone();
    reply(r)
}

/// Config with fixed test credentials.
pub fn test_config() -> GatewayConfig {
    GatewayConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
        client_id: "test-client".to_owned(),
        client_secret: "test-secret".to_owned(),
        redirect_uri: "http://localhost:8000/xero/auth/callback".to_owned(),
        scopes: "openid offline_access accounting.contacts.read accounting.settings.read"
            .to_owned(),
        storage_dir: None,
        session_lifetime_mins: 120,
        log_format: LogFormat::Text,
    }
}

/// App state over the given stores, talking to `endpoints`.
pub fn test_state(stores: Stores, endpoints: XeroEndpoints) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), stores, endpoints))
}
