//! Configuration management for formflow

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::DEFAULT_AUTH_CACHE_CAPACITY;
use crate::error::{ConfigError, Result};

/// Environment variable overriding `bpm_url`
pub const BPM_URL_ENV: &str = "FORMFLOW_BPM_URL";

/// Environment variable overriding `database_path`
pub const DATABASE_ENV: &str = "FORMFLOW_DATABASE";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Workflow engine base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpm_url: Option<String>,

    /// SQLite database file; defaults under the user data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Credentials retained by the authorization cache
    #[serde(default = "default_auth_cache_capacity")]
    pub auth_cache_capacity: usize,

    /// Timeout for workflow engine requests
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Page size used when only a page number is given
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_auth_cache_capacity() -> usize {
    DEFAULT_AUTH_CACHE_CAPACITY
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u64 {
    25
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            page_size: default_page_size(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bpm_url: None,
            database_path: None,
            auth_cache_capacity: default_auth_cache_capacity(),
            request_timeout_secs: default_request_timeout_secs(),
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".formflow").join("config.yaml"))
    }

    /// Get the default database path
    pub fn default_database_path() -> Result<PathBuf> {
        let data = dirs::data_dir().ok_or(ConfigError::Invalid(
            "Could not determine data directory".to_string(),
        ))?;

        Ok(data.join("formflow").join("applications.db"))
    }

    /// Load configuration from a specific path
    pub fn load_at(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_at(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // Set file permissions to 600 on Unix systems
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Replace file values with explicit overrides.
    pub fn apply_overrides(&mut self, bpm_url: Option<String>, database: Option<PathBuf>) {
        if let Some(url) = bpm_url.filter(|u| !u.is_empty()) {
            self.bpm_url = Some(url);
        }
        if let Some(path) = database.filter(|p| !p.as_os_str().is_empty()) {
            self.database_path = Some(path);
        }
    }

    /// Apply `FORMFLOW_BPM_URL` and `FORMFLOW_DATABASE` from the environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(BPM_URL_ENV).ok(),
            std::env::var_os(DATABASE_ENV).map(PathBuf::from),
        );
    }

    /// Workflow engine base URL, validated
    pub fn bpm_url(&self) -> Result<&str> {
        let url = self
            .bpm_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingBpmUrl)?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "bpm_url must start with http:// or https://, got {}",
                url
            ))
            .into());
        }
        Ok(url)
    }

    /// Configured database path, or the default location
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Self::default_database_path(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate that required configuration is present and sane
    pub fn validate(&self) -> Result<()> {
        self.bpm_url()?;

        if self.auth_cache_capacity == 0 {
            return Err(ConfigError::Invalid("auth_cache_capacity must be positive".to_string()).into());
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be positive".to_string()).into());
        }
        if self.preferences.page_size == 0 {
            return Err(ConfigError::Invalid("preferences.page_size must be positive".to_string()).into());
        }
        Ok(())
    }
}
