// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use axum::http::HeaderMap;

use super::*;

const NOW: i64 = 1_750_000_000;

fn bundle(expires: i64) -> TokenBundle {
    TokenBundle {
        access_token: "access".to_owned(),
        refresh_token: "refresh".to_owned(),
        expires,
        tenant_id: "tenant-1".to_owned(),
        id_token: "id".to_owned(),
    }
}

fn setup() -> (Stores, TokenStore, Session) {
    let stores = Stores::in_memory();
    let tokens = TokenStore::new(stores.clone());
    let session = Session::start(stores.kv.clone(), &HeaderMap::new(), Duration::from_secs(600));
    (stores, tokens, session)
}

#[test]
fn save_writes_session_and_blob() -> anyhow::Result<()> {
    let (stores, tokens, session) = setup();
    tokens.save(&session, &bundle(NOW + 60))?;

    assert!(session.get(SESSION_TOKEN_KEY)?.is_some());
    let blob = stores.blobs.get(TOKEN_PATH)?.unwrap_or_default();
    let parsed: TokenBundle = serde_json::from_slice(&blob)?;
    assert_eq!(parsed, bundle(NOW + 60));
    Ok(())
}

#[test]
fn resolve_prefers_session_copy() -> anyhow::Result<()> {
    let (stores, tokens, session) = setup();
    stores.blobs.put(TOKEN_PATH, serde_json::to_string(&bundle(NOW - 10))?.as_bytes())?;
    session.put(SESSION_TOKEN_KEY, serde_json::to_string(&bundle(NOW + 60))?)?;

    let resolved = tokens.resolve_active_at(Some(&session), NOW);
    assert_eq!(resolved.map(|b| b.expires).ok(), Some(NOW + 60));
    Ok(())
}

#[test]
fn resolve_falls_back_to_blob_without_session() -> anyhow::Result<()> {
    let (stores, tokens, _session) = setup();
    stores.blobs.put(TOKEN_PATH, serde_json::to_string(&bundle(NOW + 60))?.as_bytes())?;

    let resolved = tokens.resolve_active_at(None, NOW);
    assert_eq!(resolved.map(|b| b.tenant_id).ok().as_deref(), Some("tenant-1"));
    Ok(())
}

#[yare::parameterized(
    expires_now = { 0 },
    expired_earlier = { -3600 },
)]
fn resolve_rejects_expired_even_with_both_copies(offset: i64) {
    let (stores, tokens, session) = setup();
    if let Err(e) = tokens.save(&session, &bundle(NOW + offset)) {
        panic!("save failed: {e}");
    }
    assert!(stores.blobs.exists(TOKEN_PATH).unwrap_or_default());

    let Err(err) = tokens.resolve_active_at(Some(&session), NOW) else {
        panic!("expired token must not resolve");
    };
    assert_eq!(err.code, ErrorCode::TokenExpiredOrMissing);
    assert!(err.message.contains("expired"));
}

#[test]
fn resolve_missing_fails() -> anyhow::Result<()> {
    let (_stores, tokens, session) = setup();
    let err = match tokens.resolve_active_at(Some(&session), NOW) {
        Ok(_) => anyhow::bail!("missing token must not resolve"),
        Err(e) => e,
    };
    assert_eq!(err.code, ErrorCode::TokenExpiredOrMissing);
    Ok(())
}

#[test]
fn unparseable_blob_is_treated_as_missing() -> anyhow::Result<()> {
    let (stores, tokens, _session) = setup();
    stores.blobs.put(TOKEN_PATH, br#"{"test":"data"}"#)?;
    assert_eq!(tokens.load(None)?, None);
    Ok(())
}

#[test]
fn forget_is_idempotent() -> anyhow::Result<()> {
    let (stores, tokens, session) = setup();
    tokens.save(&session, &bundle(NOW + 60))?;

    tokens.forget(Some(&session))?;
    assert!(!stores.blobs.exists(TOKEN_PATH)?);
    assert_eq!(session.get(SESSION_TOKEN_KEY)?, None);

    tokens.forget(Some(&session))?;
    tokens.forget(None)?;
    Ok(())
}

#[test]
fn disconnect_elsewhere_invalidates_session_copy() -> anyhow::Result<()> {
    let (stores, tokens, session) = setup();
    tokens.save(&session, &bundle(NOW + 60))?;

    // Another browser disconnects; it has no access to this session.
    tokens.forget(None)?;

    assert!(session.get(SESSION_TOKEN_KEY)?.is_some());
    assert_eq!(tokens.load(Some(&session))?, None);
    let Err(err) = tokens.resolve_active_at(Some(&session), NOW) else {
        anyhow::bail!("session copy must not outlive the blob");
    };
    assert_eq!(err.code, ErrorCode::TokenExpiredOrMissing);
    assert!(!stores.blobs.exists(TOKEN_PATH)?);
    Ok(())
}
