// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for the gateway API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// OAuth `state` did not match any stored copy.
    InvalidState,
    /// Token exchange or identity lookup failed.
    ProviderExchange,
    TokenExpiredOrMissing,
    NotFound,
    /// Remote accounting call failed.
    UpstreamApi,
    Storage,
}

impl ErrorCode {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidState => 401,
            Self::ProviderExchange => 500,
            Self::TokenExpiredOrMissing => 500,
            Self::NotFound => 404,
            Self::UpstreamApi => 500,
            Self::Storage => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidState => "INVALID_STATE",
            Self::ProviderExchange => "PROVIDER_EXCHANGE",
            Self::TokenExpiredOrMissing => "TOKEN_EXPIRED_OR_MISSING",
            Self::NotFound => "NOT_FOUND",
            Self::UpstreamApi => "UPSTREAM_API",
            Self::Storage => "STORAGE",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation-level failure: a code, the raw message, and optional diagnostics.
#[derive(Debug, Clone)]
pub struct GatewayError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl GatewayError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Wrap an `anyhow` chain, keeping every context layer in the message.
    pub fn from_chain(code: ErrorCode, err: &anyhow::Error) -> Self {
        Self::new(code, format!("{err:#}"))
    }

    pub fn storage(err: &anyhow::Error) -> Self {
        Self::from_chain(ErrorCode::Storage, err)
    }

    pub fn upstream(err: &anyhow::Error) -> Self {
        Self::from_chain(ErrorCode::UpstreamApi, err)
    }

    pub fn exchange(err: &anyhow::Error) -> Self {
        Self::from_chain(ErrorCode::ProviderExchange, err)
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
