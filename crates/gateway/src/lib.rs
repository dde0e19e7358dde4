// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Xero gateway: OAuth2 delegated access to Xero plus token-gated vendor and
//! expense-account queries with local snapshots.

pub mod config;
pub mod error;
pub mod gateway;
pub mod oauth;
pub mod state;
pub mod store;
pub mod test_support;
pub mod transport;
pub mod xero;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::GatewayConfig;
use crate::state::AppState;
use crate::store::file::FileBlobStore;
use crate::store::memory::MemoryKvStore;
use crate::store::Stores;
use crate::transport::build_router;
use crate::xero::XeroEndpoints;

/// Run the gateway until shutdown.
pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let storage_dir = config.storage_dir();
    let stores =
        Stores::new(Arc::new(MemoryKvStore::new()), Arc::new(FileBlobStore::new(&storage_dir)));
    let state = Arc::new(AppState::new(config, stores, XeroEndpoints::default()));

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown requested");
            }
            shutdown.cancel();
        });
    }

    tracing::info!(storage = %storage_dir.display(), "xero-gateway listening on {addr}");
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
