//! Runtime configuration
//!
//! Values come from environment variables with sensible defaults, and can be
//! overridden by command-line flags.

use std::env;
use std::path::PathBuf;

use crate::cache::{FileStore, ManagerOptions, OrderingPolicy, DEFAULT_STORAGE_KEY};
use crate::data::countries::REST_COUNTRIES_BASE_URL;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the REST Countries API
    pub api_base_url: String,
    /// Directory holding the persisted searches; `None` uses the XDG cache dir
    pub cache_dir: Option<PathBuf>,
    /// Storage key the searches are persisted under
    pub storage_key: String,
    /// How out-of-order completions of the same search kind are applied
    pub ordering: OrderingPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `COUNTRIES_API_URL` - API base URL (default: https://restcountries.com/v3.1)
    /// - `COUNTRIES_CACHE_DIR` - Directory for persisted searches (default: XDG cache dir)
    /// - `COUNTRIES_STORAGE_KEY` - Key the searches are stored under (default: cacheStore)
    /// - `COUNTRIES_DISCARD_STALE` - `1`/`true` to drop out-of-order results (default: off)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        Self {
            api_base_url: non_empty("COUNTRIES_API_URL").unwrap_or(defaults.api_base_url),
            cache_dir: non_empty("COUNTRIES_CACHE_DIR").map(PathBuf::from),
            storage_key: non_empty("COUNTRIES_STORAGE_KEY").unwrap_or(defaults.storage_key),
            ordering: match non_empty("COUNTRIES_DISCARD_STALE").as_deref().map(str::trim) {
                Some("1") | Some("true") | Some("yes") => OrderingPolicy::LatestIssued,
                _ => OrderingPolicy::LastCompleted,
            },
        }
    }

    /// Options for the search cache manager
    pub fn manager_options(&self) -> ManagerOptions {
        ManagerOptions {
            storage_key: self.storage_key.clone(),
            ordering: self.ordering,
        }
    }

    /// File store at the configured directory, or the XDG cache dir
    ///
    /// Returns `None` only if no directory is configured and the XDG cache
    /// directory cannot be determined.
    pub fn file_store(&self) -> Option<FileStore> {
        match &self.cache_dir {
            Some(dir) => Some(FileStore::with_dir(dir.clone())),
            None => FileStore::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: REST_COUNTRIES_BASE_URL.to_string(),
            cache_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            ordering: OrderingPolicy::LastCompleted,
        }
    }
}
