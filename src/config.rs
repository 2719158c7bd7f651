use crate::error::*;
use crate::services::transport::DEFAULT_TIMEOUT_MS;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const TIMEOUT_ENV: &str = "RAWFETCH_TIMEOUT_MS";
pub const STORE_ROOT_ENV: &str = "RAWFETCH_STORE_ROOT";
pub const LOG_ENV: &str = "RAWFETCH_LOG";

pub const DEFAULT_LOG_FILTER: &str = "warn,rawfetch=info";

/// Runtime settings. Credentials are deliberately not part of this; they are
/// looked up when a fetch needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub timeout_ms: u64,
    pub store_root: PathBuf,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        let store_root = ProjectDirs::from("io", "rawfetch", "rawfetch")
            .map(|p| p.data_local_dir().join("buckets"))
            .unwrap_or_else(|| PathBuf::from(".rawfetch").join("buckets"));
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            store_root,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `RAWFETCH_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(raw) = get(TIMEOUT_ENV) {
            cfg.timeout_ms = raw.parse().map_err(|_| {
                RawfetchError::Config(format!("{TIMEOUT_ENV} must be an integer, got {raw:?}"))
            })?;
        }
        if let Some(root) = get(STORE_ROOT_ENV) {
            cfg.store_root = PathBuf::from(root);
        }
        if let Some(filter) = get(LOG_ENV) {
            cfg.log_filter = filter;
        }
        Ok(cfg)
    }
}
