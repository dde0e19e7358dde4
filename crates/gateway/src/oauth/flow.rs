// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authorize → callback → token exchange.

use serde::Deserialize;

use crate::error::{ErrorCode, GatewayError};
use crate::oauth::state::{self, StateCheck};
use crate::oauth::token::TokenStore;
use crate::oauth::{epoch_secs, TokenBundle};
use crate::store::session::Session;
use crate::store::Stores;
use crate::xero::XeroClient;

/// Query parameters Xero sends to the redirect URI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub code: Option<String>,
    /// Set instead of `code` when the user declines (`access_denied`).
    #[serde(default)]
    pub error: Option<String>,
}

impl CallbackParams {
    pub fn with_code(state: &str, code: &str) -> Self {
        Self { state: state.to_owned(), code: Some(code.to_owned()), error: None }
    }
}

/// Drives the authorization-code flow. Stores are injected, never global.
#[derive(Clone)]
pub struct OAuthFlow {
    stores: Stores,
    tokens: TokenStore,
    xero: XeroClient,
}

impl OAuthFlow {
    pub fn new(stores: Stores, xero: XeroClient) -> Self {
        let tokens = TokenStore::new(stores.clone());
        Self { stores, tokens, xero }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Issue a fresh state, store every copy, and return the provider URL.
    pub fn begin_authorization(&self, session: &Session) -> Result<String, GatewayError> {
        let state = state::generate_state();
        state::store_state(session, self.stores.kv.as_ref(), &state)
            .map_err(|e| GatewayError::storage(&e))?;

        tracing::info!(
            state = %state,
            session_id = %session.id(),
            cache_key = %state::cache_key(&state),
            "xero oauth state generated and stored"
        );

        Ok(self.xero.authorization_url(&state))
    }

    /// Validate the callback state, exchange the code, resolve the tenant and
    /// persist the resulting bundle.
    pub async fn complete_authorization(
        &self,
        session: &Session,
        params: &CallbackParams,
    ) -> Result<TokenBundle, GatewayError> {
        let kv = self.stores.kv.as_ref();
        let check =
            StateCheck::load(session, kv, &params.state).map_err(|e| GatewayError::storage(&e))?;

        tracing::info!(
            received_state = %check.received,
            stored_state = ?check.stored,
            cached_state = ?check.cached,
            session_id = %session.id(),
            "xero oauth callback received"
        );

        let matched = check.is_match();
        if !matched {
            tracing::error!(
                received_state = %check.received,
                stored_state = ?check.stored,
                cached_state = ?check.cached,
                session_id = %session.id(),
                "xero oauth state mismatch"
            );
        }

        // Single use: the received state goes, on either branch.
        if let Err(e) = check.consume(session, kv) {
            tracing::warn!(session_id = %session.id(), err = %e, "failed to clear oauth state");
        }

        if !matched {
            return Err(GatewayError::new(ErrorCode::InvalidState, "Invalid state")
                .with_details(check.details()));
        }

        let code = match (params.code.as_deref(), params.error.as_deref()) {
            (Some(code), _) if !code.is_empty() => code,
            (_, Some(error)) => {
                return Err(GatewayError::new(
                    ErrorCode::ProviderExchange,
                    format!("authorization was not granted: {error}"),
                ))
            }
            _ => {
                return Err(GatewayError::new(
                    ErrorCode::ProviderExchange,
                    "missing authorization code",
                ))
            }
        };

        let bundle = self.exchange(code).await?;
        self.tokens.save(session, &bundle).map_err(|e| GatewayError::storage(&e))?;
        tracing::info!(tenant_id = %bundle.tenant_id, expires = bundle.expires, "xero token stored");
        Ok(bundle)
    }

    /// Token exchange plus identity lookup. No retries.
    async fn exchange(&self, code: &str) -> Result<TokenBundle, GatewayError> {
        let issued_at = epoch_secs();
        let token = self.xero.exchange_code(code).await.map_err(|e| GatewayError::exchange(&e))?;

        let connections = self
            .xero
            .connections(&token.access_token)
            .await
            .map_err(|e| GatewayError::exchange(&e))?;
        let tenant_id = connections.into_iter().next().map(|c| c.tenant_id).ok_or_else(|| {
            GatewayError::new(ErrorCode::ProviderExchange, "no Xero organisation is connected")
        })?;

        Ok(TokenBundle {
            access_token: token.access_token,
            refresh_token: token.refresh_token.unwrap_or_default(),
            expires: issued_at.saturating_add(i64::try_from(token.expires_in).unwrap_or(i64::MAX)),
            tenant_id,
            id_token: token.id_token.unwrap_or_default(),
        })
    }

    /// Forget the bundle everywhere. Succeeds whether or not one existed.
    pub fn disconnect(&self, session: Option<&Session>) -> Result<(), GatewayError> {
        self.tokens.forget(session).map_err(|e| GatewayError::storage(&e))?;
        tracing::info!("xero token removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
