// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token persistence and resolution.
//!
//! The bundle lives in two places: the session (fast path) and the
//! `xero/tokens/token.json` blob (survives session loss and restarts). The
//! blob decides whether the gateway is connected at all.

use anyhow::Context;

use crate::error::{ErrorCode, GatewayError};
use crate::oauth::{epoch_secs, TokenBundle};
use crate::store::session::Session;
use crate::store::{Stores, TOKEN_PATH};

/// Session key holding the serialized bundle.
pub const SESSION_TOKEN_KEY: &str = "xero_token";

#[derive(Clone)]
pub struct TokenStore {
    stores: Stores,
}

impl TokenStore {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Write the bundle to the session and the blob store.
    pub fn save(&self, session: &Session, bundle: &TokenBundle) -> anyhow::Result<()> {
        let json = serde_json::to_string(bundle)?;
        session.put(SESSION_TOKEN_KEY, json.clone()).context("store token in session")?;
        self.stores.blobs.put(TOKEN_PATH, json.as_bytes()).context("store token blob")?;
        Ok(())
    }

    /// Read the bundle: session first, then the blob store.
    ///
    /// The blob is authoritative for whether a connection exists: once it is
    /// gone (disconnect from any session) a session-held copy is ignored. An
    /// unparseable copy is logged and treated as absent.
    pub fn load(&self, session: Option<&Session>) -> anyhow::Result<Option<TokenBundle>> {
        let Some(bytes) = self.stores.blobs.get(TOKEN_PATH)? else {
            if let Some(session) = session {
                if session.get(SESSION_TOKEN_KEY)?.is_some() {
                    tracing::debug!(session_id = %session.id(), "ignoring session token after disconnect");
                }
            }
            return Ok(None);
        };

        if let Some(session) = session {
            if let Some(json) = session.get(SESSION_TOKEN_KEY)? {
                match serde_json::from_str(&json) {
                    Ok(bundle) => return Ok(Some(bundle)),
                    Err(e) => {
                        tracing::warn!(session_id = %session.id(), err = %e, "unreadable session token");
                    }
                }
            }
        }

        match serde_json::from_slice(&bytes) {
            Ok(bundle) => Ok(Some(bundle)),
            Err(e) => {
                tracing::warn!(path = TOKEN_PATH, err = %e, "unreadable token blob");
                Ok(None)
            }
        }
    }

    /// Resolve a bundle usable right now. Never refreshes.
    pub fn resolve_active(&self, session: Option<&Session>) -> Result<TokenBundle, GatewayError> {
        self.resolve_active_at(session, epoch_secs())
    }

    pub fn resolve_active_at(
        &self,
        session: Option<&Session>,
        now: i64,
    ) -> Result<TokenBundle, GatewayError> {
        let bundle = self.load(session).map_err(|e| GatewayError::storage(&e))?;
        match bundle {
            Some(bundle) if bundle.is_valid_at(now) => Ok(bundle),
            Some(_) => Err(GatewayError::new(
                ErrorCode::TokenExpiredOrMissing,
                "Xero token has expired, please re-authenticate",
            )),
            None => Err(GatewayError::new(
                ErrorCode::TokenExpiredOrMissing,
                "No Xero token found, please authenticate first",
            )),
        }
    }

    /// Drop every copy of the bundle. Idempotent.
    pub fn forget(&self, session: Option<&Session>) -> anyhow::Result<()> {
        if let Some(session) = session {
            session.forget(SESSION_TOKEN_KEY).context("forget session token")?;
        }
        self.stores.blobs.delete(TOKEN_PATH).context("delete token blob")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
