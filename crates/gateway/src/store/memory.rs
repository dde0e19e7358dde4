// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store implementations.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{BlobStore, KvStore};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Key-value store with lazy TTL expiry (expired entries are dropped on read).
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.lock().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> anyhow::Result<()> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries.lock().insert(key.to_owned(), Entry { value, expires_at });
        Ok(())
    }

    fn forget(&self, key: &str) -> anyhow::Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Blob store held entirely in memory.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, path: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().get(path).cloned())
    }

    fn put(&self, path: &str, contents: &[u8]) -> anyhow::Result<()> {
        self.blobs.lock().insert(path.to_owned(), contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &str) -> anyhow::Result<bool> {
        Ok(self.blobs.lock().contains_key(path))
    }

    fn delete(&self, path: &str) -> anyhow::Result<()> {
        self.blobs.lock().remove(path);
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        format!("memory://{path}")
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
