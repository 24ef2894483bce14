//! App configuration.
//!
//! One JSON document in the app data dir. Key naming and API hosts are
//! configuration, not hard-coded literals; a missing file means
//! defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use quarry_client::ClientConfig;
use quarry_types::SecretKeys;

use crate::error::AppResult;
use crate::modules::paths::get_data_dir;

const CONFIG_FILE: &str = "config.json";

/// Content-API transport settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiSettings {
    pub api_host: String,
    pub cdn_host: String,
    pub api_version: String,
    /// Default CDN preference for new queries.
    pub use_cdn: bool,
    pub timeout_secs: u64,
    /// Explicit base URL override (self-hosted deployments).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        let client = ClientConfig::default();
        Self {
            api_host: client.api_host,
            cdn_host: client.cdn_host,
            api_version: client.api_version,
            use_cdn: false,
            timeout_secs: client.timeout_secs,
            base_url: None,
        }
    }
}

impl ApiSettings {
    /// Build the client transport configuration.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_host: self.api_host.clone(),
            cdn_host: self.cdn_host.clone(),
            api_version: self.api_version.clone(),
            timeout_secs: self.timeout_secs,
            base_url: self.base_url.clone(),
        }
    }
}

/// Application configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub keys: SecretKeys,
    pub api: ApiSettings,
}

/// Load the configuration, falling back to defaults when no file exists.
pub fn load_config() -> AppResult<AppConfig> {
    load_from(&config_path()?)
}

/// Save the configuration atomically.
pub fn save_config(config: &AppConfig) -> AppResult<()> {
    save_to(&config_path()?, config)
}

/// Update specific fields in the config.
pub fn update_config<F>(updater: F) -> AppResult<AppConfig>
where
    F: FnOnce(&mut AppConfig),
{
    let mut config = load_config()?;
    updater(&mut config);
    save_config(&config)?;
    Ok(config)
}

fn config_path() -> AppResult<PathBuf> {
    Ok(get_data_dir()?.join(CONFIG_FILE))
}

fn load_from(path: &Path) -> AppResult<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn save_to(path: &Path, config: &AppConfig) -> AppResult<()> {
    let temp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(config)?;

    // Atomic write
    if let Err(e) = fs::write(&temp_path, content) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        e.into()
    })
}
