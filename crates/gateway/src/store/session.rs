// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cookie-scoped sessions layered over the [`KvStore`].

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

use super::KvStore;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "xero_session";

/// A browser session: a namespaced view over the key-value store.
///
/// Writes go straight to the store, so a value put before a redirect is
/// already durable when the browser follows it.
#[derive(Clone)]
pub struct Session {
    id: String,
    kv: Arc<dyn KvStore>,
    lifetime: Duration,
}

impl Session {
    /// Resume the session named by the request cookie, or start a new one.
    pub fn start(kv: Arc<dyn KvStore>, headers: &HeaderMap, lifetime: Duration) -> Self {
        let id = session_id_from_headers(headers)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self { id, kv, lifetime }
    }

    /// Resume the session named by the request cookie, if any.
    pub fn resume(kv: Arc<dyn KvStore>, headers: &HeaderMap, lifetime: Duration) -> Option<Self> {
        let id = session_id_from_headers(headers)?;
        Some(Self { id, kv, lifetime })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, name: &str) -> anyhow::Result<Option<String>> {
        self.kv.get(&self.key(name))
    }

    pub fn put(&self, name: &str, value: String) -> anyhow::Result<()> {
        self.kv.put(&self.key(name), value, Some(self.lifetime))
    }

    pub fn forget(&self, name: &str) -> anyhow::Result<()> {
        self.kv.forget(&self.key(name))
    }

    /// `Set-Cookie` value binding the browser to this session.
    pub fn cookie(&self) -> String {
        format!(
            "{SESSION_COOKIE}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.id,
            self.lifetime.as_secs()
        )
    }

    fn key(&self, name: &str) -> String {
        format!("session:{}:{name}", self.id)
    }
}

/// Extract the session id from the `Cookie` header(s).
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_owned())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
