//! Derived, user-facing view of a tracking snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{TrackingEvent, TrackingSnapshot};
use crate::utils::parse_event_timestamp;

/// Status substrings that mark a package as delivered.
///
/// Matched case-insensitively against any event's status text.
pub const DELIVERY_INDICATORS: [&str; 5] = [
    "entregue",
    "delivered",
    "objeto entregue",
    "entrega realizada",
    "package delivered",
];

/// One shipping event reshaped for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    pub date: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub remark: Option<String>,
}

impl From<&TrackingEvent> for EventRecord {
    fn from(event: &TrackingEvent) -> Self {
        Self {
            date: event.date.clone(),
            status: event.status.clone(),
            location: event.address.clone(),
            remark: event.remark.clone(),
        }
    }
}

/// Read-only projection of the latest snapshot.
///
/// Derivation is pure: the same snapshot always yields the same view, and
/// absent data surfaces as `None` rather than a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingView {
    /// Status text of the newest event.
    pub current_status: Option<String>,
    /// Location text of the newest event.
    pub current_location: Option<String>,
    /// Parsed timestamp of the newest event.
    pub last_update: Option<DateTime<Utc>>,
    /// Total number of shipping events.
    pub event_count: usize,
    /// Whether any event's status marks the package as delivered.
    pub delivered: bool,
    /// Full event history, newest first.
    pub events: Vec<EventRecord>,
    /// Collection-order details, present only when carrying real values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_info: Option<Map<String, Value>>,
}

impl TrackingView {
    /// Derive the view from a snapshot.
    pub fn from_snapshot(snapshot: &TrackingSnapshot) -> Self {
        let latest = snapshot.latest_event();

        Self {
            current_status: latest.and_then(|event| event.status.clone()),
            current_location: latest.and_then(|event| event.address.clone()),
            last_update: latest
                .and_then(|event| event.date.as_deref())
                .and_then(parse_event_timestamp),
            event_count: snapshot.event_count(),
            delivered: any_delivered(&snapshot.events),
            events: snapshot.events.iter().map(EventRecord::from).collect(),
            collection_info: snapshot
                .collect_order
                .as_ref()
                .filter(|collect| collect.values().any(is_truthy))
                .cloned(),
        }
    }
}

fn any_delivered(events: &[TrackingEvent]) -> bool {
    events.iter().any(|event| {
        let status = event.status.as_deref().unwrap_or_default().to_lowercase();
        DELIVERY_INDICATORS
            .iter()
            .any(|indicator| status.contains(indicator))
    })
}

/// Truthiness of a JSON value: empty strings, zero numbers, empty
/// collections, `false` and `null` all count as empty.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event(date: &str, status: &str, address: &str) -> TrackingEvent {
        TrackingEvent {
            date: Some(date.to_string()),
            status: Some(status.to_string()),
            address: Some(address.to_string()),
            remark: None,
        }
    }

    fn make_snapshot(events: Vec<TrackingEvent>) -> TrackingSnapshot {
        TrackingSnapshot {
            events,
            collect_order: None,
        }
    }

    #[test]
    fn test_empty_snapshot_derives_absent_fields() {
        let view = TrackingView::from_snapshot(&TrackingSnapshot::default());
        assert_eq!(view.current_status, None);
        assert_eq!(view.current_location, None);
        assert_eq!(view.last_update, None);
        assert_eq!(view.event_count, 0);
        assert!(!view.delivered);
        assert!(view.events.is_empty());
        assert!(view.collection_info.is_none());
    }

    #[test]
    fn test_view_reads_newest_event() {
        let snapshot = make_snapshot(vec![
            make_event("2024-05-02T08:00:00Z", "Saiu para entrega", "Curitiba - PR"),
            make_event("2024-05-01T10:00:00Z", "Objeto postado", "São Paulo - SP"),
        ]);
        let view = TrackingView::from_snapshot(&snapshot);

        assert_eq!(view.current_status.as_deref(), Some("Saiu para entrega"));
        assert_eq!(view.current_location.as_deref(), Some("Curitiba - PR"));
        assert_eq!(
            view.last_update.unwrap().to_rfc3339(),
            "2024-05-02T08:00:00+00:00"
        );
        assert_eq!(view.event_count, 2);
        assert_eq!(view.events[1].location.as_deref(), Some("São Paulo - SP"));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let snapshot = make_snapshot(vec![make_event(
            "2024-05-01T10:00:00Z",
            "Em trânsito",
            "Cajamar - SP",
        )]);
        assert_eq!(
            TrackingView::from_snapshot(&snapshot),
            TrackingView::from_snapshot(&snapshot)
        );
    }

    #[test]
    fn test_delivered_matches_substring_any_case() {
        let delivered = make_snapshot(vec![
            make_event("2024-05-03T09:00:00Z", "OBJETO ENTREGUE ao destinatário", "Curitiba - PR"),
            make_event("2024-05-02T08:00:00Z", "Saiu para entrega", "Curitiba - PR"),
        ]);
        assert!(TrackingView::from_snapshot(&delivered).delivered);

        // "entrega" alone is not "entregue"
        let in_transit = make_snapshot(vec![make_event(
            "2024-05-02T08:00:00Z",
            "Saiu para entrega",
            "Curitiba - PR",
        )]);
        assert!(!TrackingView::from_snapshot(&in_transit).delivered);
    }

    #[test]
    fn test_delivered_found_in_older_events() {
        let snapshot = make_snapshot(vec![
            make_event("2024-05-04T12:00:00Z", "Pesquisa de satisfação", "Curitiba - PR"),
            make_event("2024-05-03T09:00:00Z", "Package delivered", "Curitiba - PR"),
        ]);
        assert!(TrackingView::from_snapshot(&snapshot).delivered);
    }

    #[test]
    fn test_status_missing_on_some_events() {
        let snapshot = make_snapshot(vec![
            TrackingEvent::default(),
            make_event("2024-05-01T10:00:00Z", "Entregue", "Curitiba - PR"),
        ]);
        let view = TrackingView::from_snapshot(&snapshot);
        assert_eq!(view.current_status, None);
        assert!(view.delivered);
    }

    #[test]
    fn test_malformed_date_leaves_timestamp_absent() {
        let snapshot = make_snapshot(vec![make_event("soon™", "Em trânsito", "Cajamar - SP")]);
        let view = TrackingView::from_snapshot(&snapshot);
        assert_eq!(view.last_update, None);
        assert_eq!(view.current_status.as_deref(), Some("Em trânsito"));
    }

    #[test]
    fn test_offsetless_date_taken_as_utc() {
        let snapshot = make_snapshot(vec![make_event("2024-05-01 10:00:00", "Postado", "São Paulo - SP")]);
        let view = TrackingView::from_snapshot(&snapshot);
        assert_eq!(
            view.last_update.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_collection_info_needs_a_real_value() {
        let mut snapshot = make_snapshot(vec![]);

        let mut empty_values = Map::new();
        empty_values.insert("orderNumber".to_string(), Value::from(""));
        empty_values.insert("weight".to_string(), Value::from(0));
        snapshot.collect_order = Some(empty_values);
        assert!(TrackingView::from_snapshot(&snapshot).collection_info.is_none());

        let mut real_values = Map::new();
        real_values.insert("orderNumber".to_string(), Value::from("CO-1"));
        snapshot.collect_order = Some(real_values.clone());
        assert_eq!(
            TrackingView::from_snapshot(&snapshot).collection_info,
            Some(real_values)
        );
    }

    #[test]
    fn test_empty_collection_info_dropped() {
        let mut snapshot = make_snapshot(vec![]);
        snapshot.collect_order = Some(Map::new());
        assert!(TrackingView::from_snapshot(&snapshot).collection_info.is_none());
    }
}
