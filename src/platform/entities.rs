//! Field definitions for the published package entities.

use serde_json::{Map, Value};

use crate::models::{PackageConfig, TrackingView};
use crate::platform::{FieldUpdate, FieldValue};

/// Static description of one published field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub device_class: Option<&'static str>,
    pub entity_category: Option<&'static str>,
}

/// The five fields published per package.
pub const FIELD_SPECS: [FieldSpec; 5] = [
    FieldSpec {
        key: "current_status",
        name: "Current Status",
        icon: "mdi:package-variant",
        device_class: None,
        entity_category: None,
    },
    FieldSpec {
        key: "current_location",
        name: "Current Location",
        icon: "mdi:map-marker",
        device_class: None,
        entity_category: None,
    },
    FieldSpec {
        key: "last_update",
        name: "Last Update",
        icon: "mdi:clock",
        device_class: Some("timestamp"),
        entity_category: None,
    },
    FieldSpec {
        key: "tracking_events",
        name: "Tracking Events",
        icon: "mdi:format-list-bulleted",
        device_class: None,
        entity_category: Some("diagnostic"),
    },
    FieldSpec {
        key: "delivered",
        name: "Delivered",
        icon: "mdi:package-check",
        device_class: Some("problem"),
        entity_category: None,
    },
];

/// Stable per-field identifier: `anjun_{tracking}_{key}`.
pub fn entity_unique_id(tracking_number: &str, key: &str) -> String {
    format!("anjun_{}_{}", tracking_number.to_lowercase(), key)
}

/// Display name: `Anjun {tracking} {field name}`.
pub fn entity_name(tracking_number: &str, field_name: &str) -> String {
    format!("Anjun {} {}", tracking_number, field_name)
}

/// Build the full field-update set for one package from its derived view.
pub fn field_updates(package: &PackageConfig, view: &TrackingView) -> Vec<FieldUpdate> {
    FIELD_SPECS
        .iter()
        .map(|spec| {
            let value = match spec.key {
                "current_status" => text_or_unknown(view.current_status.clone()),
                "current_location" => text_or_unknown(view.current_location.clone()),
                "last_update" => view
                    .last_update
                    .map(FieldValue::Timestamp)
                    .unwrap_or(FieldValue::Unknown),
                "tracking_events" => FieldValue::Count(view.event_count),
                "delivered" => FieldValue::Flag(view.delivered),
                _ => FieldValue::Unknown,
            };

            let mut attributes = Map::new();
            if spec.key == "tracking_events" {
                attributes.insert(
                    "events".to_string(),
                    serde_json::to_value(&view.events).unwrap_or_default(),
                );
            }
            // The collection attribute rides along on the sensor-style
            // fields only, never on the delivered flag.
            if spec.key != "delivered" {
                if let Some(info) = &view.collection_info {
                    attributes.insert("collection_info".to_string(), Value::Object(info.clone()));
                }
            }

            FieldUpdate {
                unique_id: entity_unique_id(&package.tracking_number, spec.key),
                key: spec.key,
                name: entity_name(&package.tracking_number, spec.name),
                value,
                icon: spec.icon,
                device_class: spec.device_class,
                entity_category: spec.entity_category,
                attributes,
            }
        })
        .collect()
}

fn text_or_unknown(value: Option<String>) -> FieldValue {
    value.map(FieldValue::Text).unwrap_or(FieldValue::Unknown)
}
