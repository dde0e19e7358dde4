// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-time CSRF `state` values and their redundant storage.
//!
//! A state is written to every ephemeral store (the session and the cache)
//! before the redirect is issued. A callback matches if either copy agrees,
//! and the received value is deleted from both whether the match succeeds
//! or fails. Another pending attempt keeps its cache copy.

use std::time::Duration;

use rand::Rng;

use crate::store::session::Session;
use crate::store::KvStore;

/// Session key holding the pending state.
pub const SESSION_STATE_KEY: &str = "oauth2state";

/// How long the cache copy of a state stays valid.
pub const STATE_TTL: Duration = Duration::from_secs(5 * 60);

/// Generate a random 128-bit state, hex-encoded.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Cache key for the copy of `state`.
pub fn cache_key(state: &str) -> String {
    format!("cache:oauth2state_{state}")
}

/// Write `state` to the session and to the cache (with [`STATE_TTL`]).
pub fn store_state(session: &Session, cache: &dyn KvStore, state: &str) -> anyhow::Result<()> {
    session.put(SESSION_STATE_KEY, state.to_owned())?;
    cache.put(&cache_key(state), state.to_owned(), Some(STATE_TTL))?;
    Ok(())
}

/// The values a callback's `state` is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCheck {
    pub received: String,
    pub stored: Option<String>,
    pub cached: Option<String>,
}

impl StateCheck {
    /// Read both stored copies for a received state.
    pub fn load(session: &Session, cache: &dyn KvStore, received: &str) -> anyhow::Result<Self> {
        let stored = session.get(SESSION_STATE_KEY)?;
        let cached =
            if received.is_empty() { None } else { cache.get(&cache_key(received))? };
        Ok(Self { received: received.to_owned(), stored, cached })
    }

    /// Non-empty and equal to at least one stored copy.
    pub fn is_match(&self) -> bool {
        !self.received.is_empty()
            && (self.stored.as_deref() == Some(self.received.as_str())
                || self.cached.as_deref() == Some(self.received.as_str()))
    }

    /// Delete the session copy and the cache entry of the received state.
    ///
    /// The cache entry of a different stored state belongs to another
    /// pending attempt and is left alone. Both deletes are attempted; the
    /// first failure is returned.
    pub fn consume(&self, session: &Session, cache: &dyn KvStore) -> anyhow::Result<()> {
        let mut results = vec![session.forget(SESSION_STATE_KEY)];
        if !self.received.is_empty() {
            results.push(cache.forget(&cache_key(&self.received)));
        }
        results.into_iter().collect()
    }

    /// The three compared values, for the 401 response body.
    pub fn details(&self) -> serde_json::Value {
        serde_json::json!({
            "received": self.received,
            "stored": self.stored,
            "cached": self.cached,
        })
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
