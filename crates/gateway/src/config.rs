// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::xero::ClientCredentials;

/// Log output format for the binary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server-side Xero OAuth2 gateway.
#[derive(Debug, Clone, Parser)]
#[command(name = "xero-gateway", version, about)]
pub struct GatewayConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "XERO_GATEWAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000, env = "XERO_GATEWAY_PORT")]
    pub port: u16,

    /// OAuth client id issued by the Xero developer portal.
    #[arg(long, env = "XERO_CLIENT_ID")]
    pub client_id: String,

    /// OAuth client secret.
    #[arg(long, env = "XERO_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,

    /// Redirect URI registered with Xero (must point at `/xero/auth/callback`).
    #[arg(long, env = "XERO_REDIRECT_URI")]
    pub redirect_uri: String,

    /// Space-separated OAuth scopes.
    #[arg(
        long,
        default_value = "openid profile email offline_access accounting.contacts.read accounting.settings.read",
        env = "XERO_SCOPES"
    )]
    pub scopes: String,

    /// Root directory for token and snapshot files.
    #[arg(long, env = "XERO_GATEWAY_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Session lifetime in minutes.
    #[arg(long, default_value_t = 120, env = "XERO_GATEWAY_SESSION_LIFETIME_MINS")]
    pub session_lifetime_mins: u64,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, env = "XERO_GATEWAY_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl GatewayConfig {
    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_lifetime_mins * 60)
    }

    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
            scopes: self.scopes.clone(),
        }
    }

    /// Storage root: the explicit flag, or [`default_storage_dir`].
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(default_storage_dir)
    }
}

/// Resolve the default storage directory.
///
/// Checks `$XDG_STATE_HOME/xero-gateway`, then `$HOME/.local/state/xero-gateway`,
/// then `./storage`.
pub fn default_storage_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return PathBuf::from(xdg).join("xero-gateway");
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local/state/xero-gateway");
    }
    PathBuf::from("storage")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
