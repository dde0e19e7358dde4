// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use xero_gateway::config::{GatewayConfig, LogFormat};

#[tokio::main]
async fn main() {
    let config = GatewayConfig::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    if let Err(e) = xero_gateway::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
