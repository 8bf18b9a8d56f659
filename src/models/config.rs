//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider endpoint and HTTP behavior settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling cadence settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Local state sink settings
    #[serde(default)]
    pub state: StateConfig,

    /// Packages to track
    #[serde(default)]
    pub packages: Vec<PackageConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if Url::parse(&self.api.base_url).is_err() {
            return Err(AppError::validation("api.base_url is not a valid URL"));
        }
        if !self.api.endpoint.starts_with('/') {
            return Err(AppError::validation("api.endpoint must start with '/'"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.refresh.interval_minutes == 0 {
            return Err(AppError::validation("refresh.interval_minutes must be > 0"));
        }
        if self.packages.is_empty() {
            return Err(AppError::validation("No packages defined"));
        }

        let mut seen = HashSet::new();
        for package in &self.packages {
            if package.tracking_number.trim().is_empty() {
                return Err(AppError::validation("packages.tracking_number is empty"));
            }
            if package.name.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "packages.name is empty for {}",
                    package.tracking_number
                )));
            }
            if package.interval_minutes == Some(0) {
                return Err(AppError::validation(format!(
                    "packages.interval_minutes must be > 0 for {}",
                    package.tracking_number
                )));
            }
            if !seen.insert(package.tracking_number.to_uppercase()) {
                return Err(AppError::validation(format!(
                    "Duplicate tracking number {}",
                    package.tracking_number
                )));
            }
        }
        Ok(())
    }
}

/// Provider endpoint and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the tracking API
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Tracking lookup path, appended to the base URL
    #[serde(default = "defaults::endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            endpoint: defaults::endpoint(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Polling cadence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Minutes between refresh cycles, unless a package overrides it
    #[serde(default = "defaults::interval_minutes")]
    pub interval_minutes: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_minutes: defaults::interval_minutes(),
        }
    }
}

/// Local state sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Directory the file publisher writes state documents into
    #[serde(default = "defaults::state_dir")]
    pub dir: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: defaults::state_dir(),
        }
    }
}

/// One package to track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// Provider tracking number; compared case-insensitively for identity
    pub tracking_number: String,

    /// Human-readable package name used in entity and notification naming
    pub name: String,

    /// Per-package refresh override in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_minutes: Option<u64>,
}

impl PackageConfig {
    /// Effective refresh period for this package.
    pub fn refresh_period(&self, refresh: &RefreshConfig) -> Duration {
        let minutes = self.interval_minutes.unwrap_or(refresh.interval_minutes);
        Duration::from_secs(minutes * 60)
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn base_url() -> String {
        "https://website-trackings.anjunexpress.com.br".into()
    }
    pub fn endpoint() -> String {
        "/tracking/get-tracking".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1 Edg/136.0.0.0"
            .into()
    }

    // Refresh defaults
    pub fn interval_minutes() -> u64 {
        30
    }

    // State defaults
    pub fn state_dir() -> PathBuf {
        PathBuf::from("state")
    }
}
