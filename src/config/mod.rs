#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use toml_config::TomlConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:4001";
pub const API_URL_ENV: &str = "EMERALD_API_URL";
pub const STORAGE_DIR_ENV: &str = "EMERALD_STORAGE_DIR";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Resolved client settings: defaults, then TOML file, then environment, then flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub storage_path: String,
    pub timeout_seconds: u64,
    pub validate_on_start: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            storage_path: default_storage_path(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            validate_on_start: false,
        }
    }
}

/// `$HOME/.emerald`, or `./.emerald` when no home directory is known.
pub fn default_storage_path() -> String {
    let base = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(".emerald").to_string_lossy().into_owned()
}

impl AppConfig {
    pub fn apply_toml(&mut self, toml: &TomlConfig) {
        if let Some(url) = toml.base_url() {
            self.api_base_url = url.to_string();
        }
        if let Some(timeout) = toml.timeout_seconds() {
            self.timeout_seconds = timeout;
        }
        if let Some(path) = toml.storage_path() {
            self.storage_path = path.to_string();
        }
        if let Some(validate) = toml.validate_on_start() {
            self.validate_on_start = validate;
        }
    }

    /// Overrides with `EMERALD_API_URL` / `EMERALD_STORAGE_DIR`. Blank values are ignored.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(API_URL_ENV) {
            self.api_base_url = url;
        }
        if let Some(path) = non_empty(STORAGE_DIR_ENV) {
            self.storage_path = path;
        }
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn validate_on_start(&self) -> bool {
        self.validate_on_start
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api_base_url)?;
        validate_path("storage.path", &self.storage_path)?;
        validate_positive_number("api.timeout_seconds", self.timeout_seconds, 1)?;
        Ok(())
    }
}
