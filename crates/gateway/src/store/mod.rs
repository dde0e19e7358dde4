// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage seams: an ephemeral key-value store (sessions + short-TTL cache)
//! and a blob store for tokens and snapshots.
//!
//! Both are injected as trait objects so the flow controller and gateway
//! never reach for ambient global state.

pub mod file;
pub mod memory;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

/// Blob path of the persisted [`TokenBundle`](crate::oauth::TokenBundle).
pub const TOKEN_PATH: &str = "xero/tokens/token.json";
/// Blob path of the last vendors snapshot.
pub const VENDORS_PATH: &str = "xero/data/vendors.json";
/// Blob path of the last accounts snapshot.
pub const ACCOUNTS_PATH: &str = "xero/data/accounts.json";

/// Ephemeral key-value store.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Write `value` under `key`. `ttl` of `None` means no expiry.
    fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> anyhow::Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn forget(&self, key: &str) -> anyhow::Result<()>;
}

/// Path-addressed blob store.
pub trait BlobStore: Send + Sync {
    fn get(&self, path: &str) -> anyhow::Result<Option<Vec<u8>>>;

    fn put(&self, path: &str, contents: &[u8]) -> anyhow::Result<()>;

    fn exists(&self, path: &str) -> anyhow::Result<bool>;

    /// Delete the blob at `path`. Deleting an absent blob is not an error.
    fn delete(&self, path: &str) -> anyhow::Result<()>;

    /// Human-readable location of `path` (reported back to clients).
    fn location(&self, path: &str) -> String;
}

/// Store handles shared by the flow controller, token store and gateway.
#[derive(Clone)]
pub struct Stores {
    pub kv: Arc<dyn KvStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl Stores {
    pub fn new(kv: Arc<dyn KvStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { kv, blobs }
    }

    /// In-memory stores, for tests and ephemeral runs.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::MemoryKvStore::new()), Arc::new(memory::MemoryBlobStore::new()))
    }
}
