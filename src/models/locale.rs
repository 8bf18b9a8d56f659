//! User-facing message strings.
//!
//! Defaults are English; a locale TOML file can replace any subset of
//! them, with `{placeholder}` markers filled in at the call site.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Localizable CLI messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Messages shown for failed tracking lookups
    #[serde(default)]
    pub errors: ErrorMessages,

    /// Status messages printed by the CLI
    #[serde(default)]
    pub messages: Messages,
}

impl LocaleConfig {
    /// Load locale strings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load locale strings or return defaults if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Locale load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }
}

/// Messages for the user-visible tracking lookup failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessages {
    #[serde(default = "defaults::tracking_not_found")]
    pub tracking_not_found: String,
    #[serde(default = "defaults::connection")]
    pub connection: String,
    #[serde(default = "defaults::unknown")]
    pub unknown: String,
}

impl Default for ErrorMessages {
    fn default() -> Self {
        Self {
            tracking_not_found: defaults::tracking_not_found(),
            connection: defaults::connection(),
            unknown: defaults::unknown(),
        }
    }
}

/// Status messages printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "defaults::run_starting")]
    pub run_starting: String,
    #[serde(default = "defaults::packages_loaded")]
    pub packages_loaded: String,
    #[serde(default = "defaults::check_passed")]
    pub check_passed: String,
    #[serde(default = "defaults::validate_ok")]
    pub validate_ok: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            run_starting: defaults::run_starting(),
            packages_loaded: defaults::packages_loaded(),
            check_passed: defaults::check_passed(),
            validate_ok: defaults::validate_ok(),
        }
    }
}

mod defaults {
    // Error defaults
    pub fn tracking_not_found() -> String {
        "Tracking number not found".into()
    }
    pub fn connection() -> String {
        "Could not reach the tracking service".into()
    }
    pub fn unknown() -> String {
        "Unexpected error while contacting the tracking service".into()
    }

    // Message defaults
    pub fn run_starting() -> String {
        "📦 Anjun tracker starting...".into()
    }
    pub fn packages_loaded() -> String {
        "Tracking {count} package(s)".into()
    }
    pub fn check_passed() -> String {
        "Tracking number {tracking} accepted".into()
    }
    pub fn validate_ok() -> String {
        "✓ Configuration OK".into()
    }
}
