//! Top-level application configuration.
//!
//! Configuration is stored in `.schooldesk/config.yaml` and includes:
//! - The backend base URL and request timeout
//! - The persisted bearer token
//! - Page size for list screens
//! - Search debounce and transient-message timings

use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeskError, Result};

/// Directory holding the configuration file, relative to the working directory
pub const ROOT_DIR: &str = ".schooldesk";

/// Overrides the configuration directory
pub const ROOT_ENV: &str = "SCHOOLDESK_ROOT";
/// Overrides the persisted token
pub const TOKEN_ENV: &str = "SCHOOLDESK_TOKEN";
/// Overrides the configured base URL
pub const BASE_URL_ENV: &str = "SCHOOLDESK_BASE_URL";

/// Resolve the configuration directory
pub fn schooldesk_root() -> PathBuf {
    match env::var(ROOT_ENV) {
        Ok(root) if !root.is_empty() => PathBuf::from(root),
        _ => PathBuf::from(ROOT_DIR),
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the school backend API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Request timeout in seconds (default: 20)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Number of records fetched per page (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Search-as-you-type settings
    #[serde(default, skip_serializing_if = "SearchConfig::is_default")]
    pub search: SearchConfig,

    /// Transient status message timings
    #[serde(default, skip_serializing_if = "ToastConfig::is_default")]
    pub toasts: ToastConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    20
}

fn default_page_size() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth: AuthConfig::default(),
            request_timeout: default_request_timeout(),
            page_size: default_page_size(),
            search: SearchConfig::default(),
            toasts: ToastConfig::default(),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Search configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching (default: 500)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Shortest trimmed query that triggers a search (default: 3)
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Maximum number of results requested (default: 10)
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    3
}

fn default_search_limit() -> u32 {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            limit: default_search_limit(),
        }
    }
}

impl SearchConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Transient status message configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastConfig {
    /// Seconds a success message stays visible (default: 3)
    #[serde(default = "default_success_secs")]
    pub success_secs: u64,

    /// Seconds an error message stays visible (default: 5)
    #[serde(default = "default_error_secs")]
    pub error_secs: u64,
}

fn default_success_secs() -> u64 {
    3
}

fn default_error_secs() -> u64 {
    5
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            success_secs: default_success_secs(),
            error_secs: default_error_secs(),
        }
    }
}

impl ToastConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        schooldesk_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            DeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DeskError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            DeskError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // The file holds the bearer token: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, permissions).map_err(|e| {
                DeskError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to set permissions on config at {}: {}",
                        path.display(),
                        e
                    ),
                ))
            })?;
        }

        Ok(())
    }

    /// Reject values that would make every screen misbehave
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(DeskError::Config("page_size must be at least 1".to_string()));
        }
        if self.request_timeout == 0 {
            return Err(DeskError::Config("request_timeout must be at least 1 second".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| DeskError::Config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        Ok(())
    }

    /// Get the bearer token from the environment or the config file
    pub fn token(&self) -> Option<String> {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }

        self.auth.token.clone().filter(|t| !t.is_empty())
    }

    /// Get the base URL, preferring the environment override
    pub fn base_url(&self) -> String {
        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.is_empty()
        {
            return url;
        }
        self.base_url.clone()
    }

    /// Set the persisted token
    pub fn set_token(&mut self, token: String) {
        self.auth.token = Some(token);
    }

    /// Forget the persisted token
    pub fn clear_token(&mut self) {
        self.auth.token = None;
    }

    /// Get the request timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Set a configuration value by dotted key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value
                .parse()
                .map_err(|_| DeskError::Config(format!("invalid value '{value}' for '{key}'")))
        }

        match key {
            "base_url" => self.base_url = value.to_string(),
            "request_timeout" => self.request_timeout = parse(key, value)?,
            "page_size" => self.page_size = parse(key, value)?,
            "search.debounce_ms" => self.search.debounce_ms = parse(key, value)?,
            "search.min_query_len" => self.search.min_query_len = parse(key, value)?,
            "search.limit" => self.search.limit = parse(key, value)?,
            "toasts.success_secs" => self.toasts.success_secs = parse(key, value)?,
            "toasts.error_secs" => self.toasts.error_secs = parse(key, value)?,
            "auth.token" => {
                return Err(DeskError::Config(
                    "use 'schooldesk login <token>' to store a token".to_string(),
                ));
            }
            _ => {
                return Err(DeskError::Config(format!(
                    "unknown config key '{key}'. Valid keys: base_url, request_timeout, page_size, \
                     search.debounce_ms, search.min_query_len, search.limit, \
                     toasts.success_secs, toasts.error_secs"
                )));
            }
        }
        self.validate()
    }
}
