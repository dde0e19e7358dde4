// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for Xero's identity and accounting APIs.

pub mod models;

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::oauth::TokenBundle;
use crate::xero::models::{Account, AccountsEnvelope, Contact, ContactsEnvelope};

pub const AUTHORIZE_URL: &str = "https://login.xero.com/identity/connect/authorize";
pub const TOKEN_URL: &str = "https://identity.xero.com/connect/token";
pub const CONNECTIONS_URL: &str = "https://api.xero.com/connections";
pub const ACCOUNTING_API_URL: &str = "https://api.xero.com/api.xro/2.0";

/// Remote endpoints. Fixed in production; tests point them at a mock.
#[derive(Debug, Clone)]
pub struct XeroEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub connections_url: String,
    pub accounting_url: String,
}

impl Default for XeroEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_URL.to_owned(),
            token_url: TOKEN_URL.to_owned(),
            connections_url: CONNECTIONS_URL.to_owned(),
            accounting_url: ACCOUNTING_API_URL.to_owned(),
        }
    }
}

impl XeroEndpoints {
    /// All endpoints under one base URL (`{base}/authorize`, `{base}/token`, ...).
    pub fn at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize_url: format!("{base}/authorize"),
            token_url: format!("{base}/token"),
            connections_url: format!("{base}/connections"),
            accounting_url: format!("{base}/api.xro/2.0"),
        }
    }
}

/// OAuth client registration.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Space-separated scope list.
    pub scopes: String,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds. Required: a reply without it is rejected.
    pub expires_in: u64,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// One organisation the user granted access to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub tenant_id: String,
    #[serde(default)]
    pub tenant_type: Option<String>,
    #[serde(default)]
    pub tenant_name: Option<String>,
}

/// Client for one Xero app registration.
#[derive(Clone)]
pub struct XeroClient {
    credentials: ClientCredentials,
    endpoints: XeroEndpoints,
    http: Client,
}

impl XeroClient {
    pub fn new(credentials: ClientCredentials, endpoints: XeroEndpoints) -> Self {
        // reqwest is built without a bundled provider.
        let _ = rustls::crypto::ring::default_provider().install_default();
        let http = Client::builder()
            .user_agent(concat!("xero-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { credentials, endpoints, http }
    }

    pub fn endpoints(&self) -> &XeroEndpoints {
        &self.endpoints
    }

    /// Build the provider authorization URL carrying `scope` and `state`.
    pub fn authorization_url(&self, state: &str) -> String {
        build_auth_url(
            &self.endpoints.authorize_url,
            &self.credentials.client_id,
            &self.credentials.redirect_uri,
            &self.credentials.scopes,
            state,
        )
    }

    /// Exchange an authorization code for tokens (form body, client secret in body).
    pub async fn exchange_code(&self, code: &str) -> anyhow::Result<TokenResponse> {
        let resp = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("token exchange failed ({status}): {}", upstream_error_message(&text));
        }

        let token: TokenResponse = resp.json().await.context("parse token response")?;
        Ok(token)
    }

    /// List the tenants connected to `access_token`.
    pub async fn connections(&self, access_token: &str) -> anyhow::Result<Vec<Connection>> {
        let resp = self
            .http
            .get(&self.endpoints.connections_url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("identity lookup failed ({status}): {}", upstream_error_message(&text));
        }

        let connections: Vec<Connection> = resp.json().await?;
        Ok(connections)
    }

    /// `GET /Contacts` for the token's tenant.
    pub async fn contacts(&self, token: &TokenBundle) -> anyhow::Result<Vec<Contact>> {
        let envelope: ContactsEnvelope =
            self.accounting_get(token, "Contacts").await.context("list contacts")?;
        Ok(envelope.contacts)
    }

    /// `GET /Accounts` for the token's tenant.
    pub async fn accounts(&self, token: &TokenBundle) -> anyhow::Result<Vec<Account>> {
        let envelope: AccountsEnvelope =
            self.accounting_get(token, "Accounts").await.context("list accounts")?;
        Ok(envelope.accounts)
    }

    async fn accounting_get<T: serde::de::DeserializeOwned>(
        &self,
        token: &TokenBundle,
        resource: &str,
    ) -> anyhow::Result<T> {
        let url = format!("{}/{resource}", self.endpoints.accounting_url.trim_end_matches('/'));
        let resp = self
            .http
            .get(url)
            .bearer_auth(&token.access_token)
            .header("Xero-tenant-id", &token.tenant_id)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Xero API error ({status}): {}", upstream_error_message(&text));
        }

        Ok(resp.json().await?)
    }
}

/// Build the authorization URL. Parameter order: client_id, response_type,
/// redirect_uri, scope, state.
pub fn build_auth_url(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> String {
    format!(
        "{auth_url}?client_id={client_id}\
         &response_type=code\
         &redirect_uri={redirect_uri}\
         &scope={scope}\
         &state={state}",
        client_id = urlencoding(client_id),
        redirect_uri = urlencoding(redirect_uri),
        scope = urlencoding(scope),
        state = urlencoding(state),
    )
}

/// Pull a readable message out of an upstream error body.
///
/// OAuth errors carry `error`; accounting errors carry `Message`. Anything
/// else is passed through verbatim.
fn upstream_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_owned();
    };
    for key in ["error", "error_description", "Message", "Detail"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            return msg.to_owned();
        }
    }
    body.to_owned()
}

/// Form-style encoding for URL query parameters (spaces as `+`).
fn urlencoding(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0xf) as usize]));
            }
        }
    }
    out
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
