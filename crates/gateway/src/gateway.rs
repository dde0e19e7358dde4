// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Token-gated accounting queries and their local snapshots.

use serde::de::IgnoredAny;
use serde::Serialize;

use crate::error::{ErrorCode, GatewayError};
use crate::oauth::token::TokenStore;
use crate::store::session::Session;
use crate::store::{Stores, ACCOUNTS_PATH, VENDORS_PATH};
use crate::xero::models::{
    expense_accounts, suppliers, AccountRecord, AccountSnapshot, VendorRecord, VendorSnapshot,
};
use crate::xero::XeroClient;

/// Records returned by a successful fetch, plus where the snapshot was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: Vec<T>,
    pub storage_path: String,
}

#[derive(Clone)]
pub struct AccountingGateway {
    stores: Stores,
    tokens: TokenStore,
    xero: XeroClient,
}

impl AccountingGateway {
    pub fn new(stores: Stores, tokens: TokenStore, xero: XeroClient) -> Self {
        Self { stores, tokens, xero }
    }

    /// Suppliers of the connected tenant. Overwrites the vendors snapshot.
    pub async fn fetch_vendors(
        &self,
        session: Option<&Session>,
    ) -> Result<Fetched<VendorRecord>, GatewayError> {
        let token = self.tokens.resolve_active(session)?;
        let contacts = self.xero.contacts(&token).await.map_err(|e| GatewayError::upstream(&e))?;
        let vendors = suppliers(contacts);

        let snapshot = VendorSnapshot { last_updated: now_iso8601(), vendors };
        let storage_path = self.write_snapshot(VENDORS_PATH, &snapshot)?;
        tracing::info!(count = snapshot.vendors.len(), path = %storage_path, "vendors snapshot written");
        Ok(Fetched { data: snapshot.vendors, storage_path })
    }

    /// Expense accounts of the connected tenant. Overwrites the accounts snapshot.
    pub async fn fetch_accounts(
        &self,
        session: Option<&Session>,
    ) -> Result<Fetched<AccountRecord>, GatewayError> {
        let token = self.tokens.resolve_active(session)?;
        let accounts = self.xero.accounts(&token).await.map_err(|e| GatewayError::upstream(&e))?;
        let accounts = expense_accounts(accounts);

        let snapshot = AccountSnapshot { last_updated: now_iso8601(), accounts };
        let storage_path = self.write_snapshot(ACCOUNTS_PATH, &snapshot)?;
        tracing::info!(count = snapshot.accounts.len(), path = %storage_path, "accounts snapshot written");
        Ok(Fetched { data: snapshot.accounts, storage_path })
    }

    /// Last vendors snapshot, byte for byte as stored. No authentication involved.
    pub fn read_local_vendors(&self) -> Result<String, GatewayError> {
        self.read_snapshot(VENDORS_PATH)
    }

    /// Last accounts snapshot, byte for byte as stored. No authentication involved.
    pub fn read_local_accounts(&self) -> Result<String, GatewayError> {
        self.read_snapshot(ACCOUNTS_PATH)
    }

    fn write_snapshot<S: Serialize>(&self, path: &str, snapshot: &S) -> Result<String, GatewayError> {
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| GatewayError::storage(&anyhow::Error::from(e)))?;
        self.stores.blobs.put(path, &json).map_err(|e| GatewayError::storage(&e))?;
        Ok(self.stores.blobs.location(path))
    }

    /// Stored snapshot text. Parsed only to reject corrupt JSON, never re-encoded.
    fn read_snapshot(&self, path: &str) -> Result<String, GatewayError> {
        let bytes = self
            .stores
            .blobs
            .get(path)
            .map_err(|e| GatewayError::storage(&e))?
            .ok_or_else(|| GatewayError::new(ErrorCode::NotFound, "No local data available"))?;
        serde_json::from_slice::<IgnoredAny>(&bytes).map_err(|e| {
            GatewayError::storage(&anyhow::Error::from(e).context(format!("parse {path}")))
        })?;
        String::from_utf8(bytes).map_err(|e| {
            GatewayError::storage(&anyhow::Error::from(e).context(format!("decode {path}")))
        })
    }
}

fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
