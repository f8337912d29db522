//! Persistent key-value store adapter.
//!
//! One JSON document per key under a data directory. The trait seam keeps the
//! rest of the app independent of the backing medium, and lets tests swap in
//! an in-memory store.
//!
//! Failure policy: reads fall back to a caller-supplied default (and log);
//! write errors always propagate to the caller — they are never dropped.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Contract for the persistent store: get/set/remove of raw JSON strings.
/// Keys are short `[a-z0-9_-]` names chosen by this crate, never user input.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored document, or `None` if the key has never been written.
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores a document under `key`, replacing any previous value.
    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the document under `key`. Missing keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Reads and deserializes the value under `key`.
///
/// Any failure — missing key, unreadable file, unparseable JSON — returns the
/// supplied default and logs a warning. The app keeps running on a fresh value.
pub async fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.get_raw(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored value is unreadable, falling back to default");
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!(key, error = %e, "storage read failed, falling back to default");
            default
        }
    }
}

/// Serializes and writes `value` under `key`. Errors propagate to the caller.
pub async fn set_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set_raw(key, &raw).await
}

/// File-backed store: `<data_dir>/<key>.json` per key.
///
/// Writes go to a `.tmp` sibling first and are renamed into place, so a crash
/// mid-write leaves the previous document intact rather than a torn file.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) the data directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(FileStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json.tmp"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let tmp = self.tmp_path_for(key);
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, self.path_for(key)).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
