// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OAuth2 authorization-code flow against Xero and token lifecycle.
//!
//! `Unauthenticated -> StatePending` on [`flow::OAuthFlow::begin_authorization`],
//! `StatePending -> Authenticated` on a matching callback, back to
//! `Unauthenticated` on mismatch or exchange failure. Expiry of an
//! authenticated bundle is checked lazily by [`token::TokenStore`].

pub mod flow;
pub mod state;
pub mod token;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Credentials and tenant for the connected Xero organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Expiry as epoch seconds.
    pub expires: i64,
    pub tenant_id: String,
    #[serde(default)]
    pub id_token: String,
}

impl TokenBundle {
    /// A bundle is valid only while `now < expires`.
    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires
    }
}

/// Current epoch seconds.
pub fn epoch_secs() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or_default()
}
