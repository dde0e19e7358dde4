// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::SocketAddr;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use super::*;

fn test_credentials() -> ClientCredentials {
    ClientCredentials {
        client_id: "client-123".to_owned(),
        client_secret: "secret-456".to_owned(),
        redirect_uri: "http://localhost:8000/xero/auth/callback".to_owned(),
        scopes: "openid accounting.contacts.read".to_owned(),
    }
}

fn test_bundle() -> TokenBundle {
    TokenBundle {
        access_token: "access-1".to_owned(),
        refresh_token: "refresh-1".to_owned(),
        expires: i64::MAX,
        tenant_id: "tenant-1".to_owned(),
        id_token: String::new(),
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    addr
}

#[test]
fn auth_url_carries_scope_and_state_in_order() {
    let url = build_auth_url(
        "https://login.xero.com/identity/connect/authorize",
        "client-123",
        "http://localhost:8000/xero/auth/callback",
        "openid accounting.contacts.read",
        "0123abcd",
    );
    assert!(url.starts_with("https://login.xero.com/identity/connect/authorize?client_id=client-123&"));
    let q = url.split('?').nth(1).unwrap_or_default();
    let keys: Vec<&str> = q.split('&').filter_map(|p| p.split('=').next()).collect();
    assert_eq!(keys, ["client_id", "response_type", "redirect_uri", "scope", "state"]);
    assert!(url.contains("scope=openid+accounting.contacts.read"));
    assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fxero%2Fauth%2Fcallback"));
    assert!(url.ends_with("&state=0123abcd"));
}

#[test]
fn client_uses_configured_authorize_endpoint() {
    let client = XeroClient::new(test_credentials(), XeroEndpoints::at("http://mock:1/"));
    let url = client.authorization_url("s");
    assert!(url.starts_with("http://mock:1/authorize?client_id=client-123"));
    assert_eq!(client.endpoints().accounting_url, "http://mock:1/api.xro/2.0");
}

#[test]
fn default_endpoints_are_xero() {
    let endpoints = XeroEndpoints::default();
    assert_eq!(endpoints.authorize_url, AUTHORIZE_URL);
    assert_eq!(endpoints.token_url, TOKEN_URL);
    assert_eq!(endpoints.connections_url, CONNECTIONS_URL);
}

#[yare::parameterized(
    oauth = { r#"{"error":"invalid_grant"}"#, "invalid_grant" },
    accounting = { r#"{"Type":"x","Message":"AuthenticationUnsuccessful"}"#, "AuthenticationUnsuccessful" },
    plain = { "Bad Gateway", "Bad Gateway" },
    json_without_known_keys = { r#"{"foo":1}"#, r#"{"foo":1}"# },
)]
fn extracts_upstream_message(body: &str, expected: &str) {
    assert_eq!(upstream_error_message(body), expected);
}

#[tokio::test]
async fn exchange_code_posts_form_and_parses_tokens() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/token",
        post(|body: String| async move {
            assert!(body.contains("grant_type=authorization_code"));
            assert!(body.contains("code=the-code"));
            assert!(body.contains("client_secret=secret-456"));
            axum::Json(serde_json::json!({
                "access_token": "a",
                "refresh_token": "r",
                "expires_in": 1800,
                "id_token": "i",
                "token_type": "Bearer"
            }))
        }),
    );
    let addr = serve(app).await;
    let client = XeroClient::new(test_credentials(), XeroEndpoints::at(&format!("http://{addr}")));

    let token = client.exchange_code("the-code").await?;
    assert_eq!(token.access_token, "a");
    assert_eq!(token.refresh_token.as_deref(), Some("r"));
    assert_eq!(token.expires_in, 1800);
    assert_eq!(token.id_token.as_deref(), Some("i"));
    Ok(())
}

#[tokio::test]
async fn exchange_code_surfaces_upstream_error() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/token",
        post(|| async { (StatusCode::BAD_REQUEST, r#"{"error":"invalid_grant"}"#) }),
    );
    let addr = serve(app).await;
    let client = XeroClient::new(test_credentials(), XeroEndpoints::at(&format!("http://{addr}")));

    let err = match client.exchange_code("bad").await {
        Ok(_) => anyhow::bail!("expected exchange failure"),
        Err(e) => e,
    };
    let msg = err.to_string();
    assert!(msg.contains("400"), "{msg}");
    assert!(msg.contains("invalid_grant"), "{msg}");
    Ok(())
}

#[tokio::test]
async fn exchange_code_requires_expires_in() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/token",
        post(|| async {
            axum::Json(serde_json::json!({ "access_token": "a", "token_type": "Bearer" }))
        }),
    );
    let addr = serve(app).await;
    let client = XeroClient::new(test_credentials(), XeroEndpoints::at(&format!("http://{addr}")));

    let err = match client.exchange_code("the-code").await {
        Ok(token) => anyhow::bail!("reply without expires_in accepted: {token:?}"),
        Err(e) => e,
    };
    assert!(format!("{err:#}").starts_with("parse token response"), "{err:#}");
    Ok(())
}

#[tokio::test]
async fn connections_sends_bearer() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/connections",
        get(|headers: HeaderMap| async move {
            assert_eq!(
                headers.get("authorization").and_then(|v| v.to_str().ok()),
                Some("Bearer access-1")
            );
            axum::Json(serde_json::json!([
                { "id": "c1", "tenantId": "tenant-1", "tenantType": "ORGANISATION", "tenantName": "Demo" },
                { "id": "c2", "tenantId": "tenant-2" }
            ]))
        }),
    );
    let addr = serve(app).await;
    let client = XeroClient::new(test_credentials(), XeroEndpoints::at(&format!("http://{addr}")));

    let connections = client.connections("access-1").await?;
    assert_eq!(connections.len(), 2);
    assert_eq!(connections[0].tenant_id, "tenant-1");
    assert_eq!(connections[0].tenant_name.as_deref(), Some("Demo"));
    assert_eq!(connections[1].tenant_type, None);
    Ok(())
}

#[tokio::test]
async fn contacts_send_tenant_header() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/api.xro/2.0/Contacts",
        get(|headers: HeaderMap| async move {
            assert_eq!(
                headers.get("xero-tenant-id").and_then(|v| v.to_str().ok()),
                Some("tenant-1")
            );
            axum::Json(serde_json::json!({
                "Contacts": [{ "ContactID": "v1", "Name": "Acme", "ContactStatus": "ACTIVE", "IsSupplier": true }]
            }))
        }),
    );
    let addr = serve(app).await;
    let client = XeroClient::new(test_credentials(), XeroEndpoints::at(&format!("http://{addr}")));

    let contacts = client.contacts(&test_bundle()).await?;
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Acme");
    Ok(())
}

#[tokio::test]
async fn accounts_error_carries_context() -> anyhow::Result<()> {
    let app = Router::new().route(
        "/api.xro/2.0/Accounts",
        get(|| async { (StatusCode::UNAUTHORIZED, r#"{"Message":"AuthenticationUnsuccessful"}"#) }),
    );
    let addr = serve(app).await;
    let client = XeroClient::new(test_credentials(), XeroEndpoints::at(&format!("http://{addr}")));

    let err = match client.accounts(&test_bundle()).await {
        Ok(_) => anyhow::bail!("expected API failure"),
        Err(e) => e,
    };
    let msg = format!("{err:#}");
    assert!(msg.starts_with("list accounts: "), "{msg}");
    assert!(msg.contains("AuthenticationUnsuccessful"), "{msg}");
    Ok(())
}
