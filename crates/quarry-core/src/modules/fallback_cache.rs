//! Local fallback cache.
//!
//! Same-device, lower-trust storage (the original runtime's
//! `localStorage`). Only ever a migration source: once a value is
//! confirmed persisted to the secret store it is removed here and never
//! written back.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::modules::paths::get_data_dir;
use crate::modules::secret_store::atomic_write;

/// Same-device key/value cache used transitionally before a value is
/// confirmed persisted to the store.
#[async_trait]
pub trait FallbackCache: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// In-memory cache.
#[derive(Default)]
pub struct MemoryFallbackCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryFallbackCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FallbackCache for MemoryFallbackCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

const CACHE_FILE: &str = "fallback_cache.json";

/// File-backed cache. Kept in a separate document from the secret store
/// file; the two trust levels never share a path.
pub struct FileFallbackCache {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileFallbackCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    /// Cache at the default location under the app data dir.
    pub fn in_data_dir() -> AppResult<Self> {
        Ok(Self::new(get_data_dir()?.join(CACHE_FILE)))
    }

    async fn read_entries(&self) -> AppResult<HashMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(AppError::Io(e)),
        };
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> AppResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        Ok(atomic_write(&self.path, &content).await?)
    }
}

#[async_trait]
impl FallbackCache for FileFallbackCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_entries().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}
