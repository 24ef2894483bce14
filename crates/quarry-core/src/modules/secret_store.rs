//! Credential store adapter.
//!
//! The authoritative long-term home for the token is a host-provided
//! secret service this crate does not control. [`SecretStore`] is the
//! opaque get/set/clear seam over it; the file-backed implementation
//! stands in where no host service exists, and the in-memory one serves
//! embedders and tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::modules::paths::get_data_dir;

/// Opaque named-key secret service. May fail or be unavailable; callers
/// degrade rather than abort.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, key: &str) -> AppResult<Option<String>>;
    async fn set_secret(&self, key: &str, value: &str) -> AppResult<()>;
    async fn clear_secret(&self, key: &str) -> AppResult<()>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemorySecretStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots.lock().await.get(key).cloned())
    }

    async fn set_secret(&self, key: &str, value: &str) -> AppResult<()> {
        self.slots.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear_secret(&self, key: &str) -> AppResult<()> {
        self.slots.lock().await.remove(key);
        Ok(())
    }
}

const SECRETS_FILE: &str = "secrets.json";

/// File-backed store: one JSON document of key/value slots in the app
/// data dir, written atomically under a file lock.
pub struct FileSecretStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, lock: Mutex::new(()) }
    }

    /// Store at the default location under the app data dir.
    pub fn in_data_dir() -> AppResult<Self> {
        Ok(Self::new(get_data_dir()?.join(SECRETS_FILE)))
    }

    async fn read_slots(&self) -> AppResult<HashMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(AppError::Store(format!("failed to read secrets: {}", e))),
        };
        serde_json::from_str(&content)
            .map_err(|e| AppError::Store(format!("failed to parse secrets: {}", e)))
    }

    async fn write_slots(&self, slots: &HashMap<String, String>) -> AppResult<()> {
        let content = serde_json::to_string_pretty(slots)
            .map_err(|e| AppError::Store(format!("failed to serialize secrets: {}", e)))?;
        atomic_write(&self.path, &content)
            .await
            .map_err(|e| AppError::Store(format!("failed to write secrets: {}", e)))
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_slots().await?.get(key).cloned())
    }

    async fn set_secret(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut slots = self.read_slots().await?;
        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots).await
    }

    async fn clear_secret(&self, key: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut slots = self.read_slots().await?;
        if slots.remove(key).is_some() {
            self.write_slots(&slots).await?;
        }
        Ok(())
    }
}

/// Write via temp file + rename so a crash never leaves a half-written
/// document behind.
pub(crate) async fn atomic_write(path: &Path, content: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    if let Err(e) = tokio::fs::write(&temp_path, content).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }
    Ok(())
}
