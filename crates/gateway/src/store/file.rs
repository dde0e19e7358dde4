// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem blob store with atomic writes.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Context;

use super::BlobStore;

/// Blob store rooted at a directory. Blob paths are relative, `/`-separated.
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(path);
        if !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            anyhow::bail!("invalid blob path: {path}");
        }
        Ok(self.root.join(rel))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, path: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        match std::fs::read(&full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", full.display())),
        }
    }

    /// Write atomically (unique tmp file + rename), creating parent directories.
    ///
    /// The tmp name carries PID + counter so concurrent writers of the same
    /// blob never share a tmp file.
    fn put(&self, path: &str, contents: &[u8]) -> anyhow::Result<()> {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(
            "{}.{}.{}.tmp",
            full.file_name().unwrap_or_default().to_string_lossy(),
            std::process::id(),
            seq,
        );
        let tmp_path = full.with_file_name(tmp_name);
        std::fs::write(&tmp_path, contents)
            .with_context(|| format!("write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &full).with_context(|| format!("rename to {}", full.display()))?;
        Ok(())
    }

    fn exists(&self, path: &str) -> anyhow::Result<bool> {
        Ok(self.resolve(path)?.is_file())
    }

    fn delete(&self, path: &str) -> anyhow::Result<()> {
        let full = self.resolve(path)?;
        match std::fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", full.display())),
        }
    }

    fn location(&self, path: &str) -> String {
        self.root.join(path).display().to_string()
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
