//! Host-platform boundary for publishing tracker state.
//!
//! Entity registries, dashboards and notification delivery belong to
//! whatever automation platform hosts the tracker. The tracker only
//! depends on the narrow `StatePublisher` surface below:
//!
//! - `FileStatePublisher`: JSON state documents on local disk
//! - `LogPublisher`: log lines only, for dry runs
//!
//! ## Published shape
//!
//! ```text
//! one device per package
//! └── five fields: current_status, current_location, last_update,
//!     tracking_events, delivered
//! ```

pub mod entities;
pub mod file;
pub mod log;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::PackageConfig;

// Re-export for convenience
pub use self::file::FileStatePublisher;
pub use self::log::LogPublisher;

/// Attribution line shown next to published data.
pub const ATTRIBUTION: &str = "Data provided by Anjun Express";

/// Manufacturer name reported on package devices.
pub const MANUFACTURER: &str = "Anjun Express";

/// Value of one published field.
///
/// Serializes untagged, so state documents carry plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Count(usize),
    Timestamp(DateTime<Utc>),
    /// The field has no value in the current snapshot.
    Unknown,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) => f.write_str(value),
            FieldValue::Flag(value) => write!(f, "{}", value),
            FieldValue::Count(value) => write!(f, "{}", value),
            FieldValue::Timestamp(value) => f.write_str(&value.to_rfc3339()),
            FieldValue::Unknown => f.write_str("unknown"),
        }
    }
}

/// One derived field ready for publication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldUpdate {
    /// Stable identifier, `anjun_{tracking}_{key}`
    pub unique_id: String,
    /// Field key, e.g. `current_status`
    pub key: &'static str,
    /// Display name, e.g. `Anjun AJ123 Current Status`
    pub name: String,
    /// Current value
    pub value: FieldValue,
    /// Icon hint for the host platform
    pub icon: &'static str,
    /// Device class hint, when the platform defines one for this field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'static str>,
    /// `diagnostic` for fields that belong off the main dashboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<&'static str>,
    /// Extra attributes such as the event history
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

/// A user-facing notification.
///
/// Raising the same id again replaces the earlier notification instead
/// of stacking a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
}

/// Device identity grouping one package's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    pub manufacturer: &'static str,
    pub model: String,
}

impl DeviceInfo {
    /// Device identity for one tracked package.
    pub fn for_package(package: &PackageConfig) -> Self {
        Self {
            name: format!("Anjun {} ({})", package.name, package.tracking_number),
            manufacturer: MANUFACTURER,
            model: format!("Package Tracking - {}", package.tracking_number),
        }
    }
}

/// Sink for everything the tracker publishes.
#[async_trait]
pub trait StatePublisher: Send + Sync {
    /// Publish the full derived field set for one package.
    ///
    /// Always called with all fields of a refresh at once, so consumers
    /// never observe a partially updated view.
    async fn publish_fields(&self, package: &PackageConfig, updates: &[FieldUpdate]) -> Result<()>;

    /// Raise a notification; an existing one with the same id is replaced.
    async fn publish_notification(&self, notification: &Notification) -> Result<()>;

    /// Flag a package's published fields as fresh or stale.
    async fn publish_availability(&self, package: &PackageConfig, available: bool) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_serializes_untagged() {
        assert_eq!(
            serde_json::to_value(FieldValue::Text("Em trânsito".into())).unwrap(),
            serde_json::json!("Em trânsito")
        );
        assert_eq!(
            serde_json::to_value(FieldValue::Count(3)).unwrap(),
            serde_json::json!(3)
        );
        assert_eq!(
            serde_json::to_value(FieldValue::Flag(true)).unwrap(),
            serde_json::json!(true)
        );
        assert_eq!(
            serde_json::to_value(FieldValue::Unknown).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_device_info_naming() {
        let package = PackageConfig {
            tracking_number: "AJ123456789BR".to_string(),
            name: "Birthday Gift".to_string(),
            interval_minutes: None,
        };
        let device = DeviceInfo::for_package(&package);

        assert_eq!(device.name, "Anjun Birthday Gift (AJ123456789BR)");
        assert_eq!(device.manufacturer, "Anjun Express");
        assert_eq!(device.model, "Package Tracking - AJ123456789BR");
    }
}
