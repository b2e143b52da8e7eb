//! CLI configuration.
//!
//! Resolution order, lowest to highest:
//! 1. Built-in defaults
//! 2. Config file (`~/.config/keyfob/config.json` on Linux)
//! 3. Environment variables (`KEYFOB_CLIENT_ID`, `KEYFOB_SECRET_KEY`)
//! 4. CLI arguments

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persistent defaults for the `keyfob` binary. Every field is optional;
/// missing values fall through to flags, env vars, or built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// API client id issued by the validation service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Base64 API secret key issued by the validation service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Accept only factory-programmed ("cc") devices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_only: Option<bool>,
    /// Overall verification deadline in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load the config file, or defaults when none exists. A file that
    /// exists but cannot be read or parsed is an error.
    pub fn load() -> anyhow::Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file {}: {}", path.display(), e)
        })
    }
}

/// Path of the config file.
pub fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".keyfob").join("config.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/keyfob/config.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("keyfob").join("config.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}
