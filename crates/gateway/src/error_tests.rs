// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    invalid_state = { ErrorCode::InvalidState, StatusCode::UNAUTHORIZED },
    provider_exchange = { ErrorCode::ProviderExchange, StatusCode::INTERNAL_SERVER_ERROR },
    token_missing = { ErrorCode::TokenExpiredOrMissing, StatusCode::INTERNAL_SERVER_ERROR },
    not_found = { ErrorCode::NotFound, StatusCode::NOT_FOUND },
    upstream_api = { ErrorCode::UpstreamApi, StatusCode::INTERNAL_SERVER_ERROR },
    storage = { ErrorCode::Storage, StatusCode::INTERNAL_SERVER_ERROR },
)]
fn status_mapping(code: ErrorCode, expected: StatusCode) {
    assert_eq!(code.status_code(), expected);
    assert_eq!(GatewayError::new(code, "boom").status_code(), expected);
}

#[test]
fn from_chain_keeps_context() {
    let err = anyhow::anyhow!("connection refused").context("list contacts");
    let gw = GatewayError::upstream(&err);
    assert_eq!(gw.code, ErrorCode::UpstreamApi);
    assert_eq!(gw.message, "list contacts: connection refused");
    assert_eq!(gw.to_string(), "UPSTREAM_API: list contacts: connection refused");
}

#[test]
fn details_are_attached() {
    let gw = GatewayError::new(ErrorCode::InvalidState, "Invalid state")
        .with_details(serde_json::json!({ "received": "a" }));
    assert_eq!(gw.details, Some(serde_json::json!({ "received": "a" })));
}
