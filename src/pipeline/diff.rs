//! New-event detection between tracking snapshots.
//!
//! The provider assigns no event identifiers, so detection is count-based:
//! the event list growing since the previous fetch means the newest entry
//! is new. Same-length content edits and reorders are deliberately
//! invisible to this check.

use serde::{Deserialize, Serialize};

use crate::models::TrackingSnapshot;

/// Fallback status text for a new event that carries none.
const UNKNOWN_STATUS: &str = "Unknown status";
/// Fallback location text for a new event that carries none.
const UNKNOWN_LOCATION: &str = "Unknown location";

/// Notification payload extracted from a newly appended event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEventInfo {
    pub status: String,
    pub location: String,
    pub date: String,
}

/// Compare the previous and current snapshots and report a newly
/// appended event, if any.
///
/// The first fetch never reports; neither does a cycle where either event
/// list is empty. At most one event is reported per cycle, the head of
/// the grown current list, which the provider orders newest first.
pub fn detect_new_event(
    previous: Option<&TrackingSnapshot>,
    current: &TrackingSnapshot,
) -> Option<NewEventInfo> {
    let previous = previous?;
    if previous.events.is_empty() || current.events.is_empty() {
        return None;
    }
    if current.event_count() <= previous.event_count() {
        return None;
    }

    let latest = current.latest_event()?;
    Some(NewEventInfo {
        status: latest
            .status
            .clone()
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        location: latest
            .address
            .clone()
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        date: latest.date.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrackingEvent;

    fn make_event(status: &str) -> TrackingEvent {
        TrackingEvent {
            date: Some("2024-05-01T10:00:00Z".to_string()),
            status: Some(status.to_string()),
            address: Some("Cajamar - SP".to_string()),
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
    fn test_first_fetch_reports_nothing() {
        let current = make_snapshot(vec![make_event("Objeto postado")]);
        assert_eq!(detect_new_event(None, &current), None);
    }

    #[test]
    fn test_empty_previous_reports_nothing() {
        let previous = make_snapshot(vec![]);
        let current = make_snapshot(vec![make_event("Objeto postado")]);
        assert_eq!(detect_new_event(Some(&previous), &current), None);
    }

    #[test]
    fn test_empty_current_reports_nothing() {
        let previous = make_snapshot(vec![make_event("Objeto postado")]);
        let current = make_snapshot(vec![]);
        assert_eq!(detect_new_event(Some(&previous), &current), None);
    }

    #[test]
    fn test_appended_event_reported() {
        let previous = make_snapshot(vec![make_event("Objeto postado")]);
        let current = make_snapshot(vec![
            make_event("Saiu para entrega"),
            make_event("Objeto postado"),
        ]);

        let info = detect_new_event(Some(&previous), &current).unwrap();
        assert_eq!(info.status, "Saiu para entrega");
        assert_eq!(info.location, "Cajamar - SP");
        assert_eq!(info.date, "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_same_length_edit_invisible() {
        let previous = make_snapshot(vec![make_event("Objeto postado")]);
        let current = make_snapshot(vec![make_event("Objeto postado em unidade")]);
        assert_eq!(detect_new_event(Some(&previous), &current), None);
    }

    #[test]
    fn test_shrunk_list_reports_nothing() {
        let previous = make_snapshot(vec![
            make_event("Saiu para entrega"),
            make_event("Objeto postado"),
        ]);
        let current = make_snapshot(vec![make_event("Saiu para entrega")]);
        assert_eq!(detect_new_event(Some(&previous), &current), None);
    }

    #[test]
    fn test_multiple_appends_report_newest_only() {
        let previous = make_snapshot(vec![make_event("Objeto postado")]);
        let current = make_snapshot(vec![
            make_event("Entregue"),
            make_event("Saiu para entrega"),
            make_event("Objeto postado"),
        ]);

        let info = detect_new_event(Some(&previous), &current).unwrap();
        assert_eq!(info.status, "Entregue");
    }

    #[test]
    fn test_missing_fields_fall_back() {
        let previous = make_snapshot(vec![make_event("Objeto postado")]);
        let current = make_snapshot(vec![TrackingEvent::default(), make_event("Objeto postado")]);

        let info = detect_new_event(Some(&previous), &current).unwrap();
        assert_eq!(info.status, "Unknown status");
        assert_eq!(info.location, "Unknown location");
        assert_eq!(info.date, "");
    }

    #[test]
    fn test_present_empty_fields_pass_through() {
        let previous = make_snapshot(vec![make_event("Objeto postado")]);
        let blank = TrackingEvent {
            date: Some(String::new()),
            status: Some(String::new()),
            address: Some(String::new()),
            remark: None,
        };
        let current = make_snapshot(vec![blank, make_event("Objeto postado")]);

        let info = detect_new_event(Some(&previous), &current).unwrap();
        assert_eq!(info.status, "");
        assert_eq!(info.location, "");
    }
}
