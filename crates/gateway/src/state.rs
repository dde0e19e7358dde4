// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::HeaderMap;

use crate::config::GatewayConfig;
use crate::gateway::AccountingGateway;
use crate::oauth::flow::OAuthFlow;
use crate::store::session::Session;
use crate::store::Stores;
use crate::xero::{XeroClient, XeroEndpoints};

/// Shared gateway state. Holds no mutable data of its own; everything
/// per-user lives in the injected stores.
pub struct AppState {
    pub config: GatewayConfig,
    pub stores: Stores,
    pub flow: OAuthFlow,
    pub gateway: AccountingGateway,
}

impl AppState {
    pub fn new(config: GatewayConfig, stores: Stores, endpoints: XeroEndpoints) -> Self {
        let xero = XeroClient::new(config.credentials(), endpoints);
        let flow = OAuthFlow::new(stores.clone(), xero.clone());
        let gateway = AccountingGateway::new(stores.clone(), flow.tokens().clone(), xero);
        Self { config, stores, flow, gateway }
    }

    /// Resume or start the caller's session.
    pub fn session(&self, headers: &HeaderMap) -> Session {
        Session::start(self.stores.kv.clone(), headers, self.config.session_lifetime())
    }

    /// Resume the caller's session if the request names one.
    pub fn existing_session(&self, headers: &HeaderMap) -> Option<Session> {
        Session::resume(self.stores.kv.clone(), headers, self.config.session_lifetime())
    }
}
