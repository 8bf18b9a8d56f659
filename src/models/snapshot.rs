//! Raw tracking payload as returned by the provider.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One shipping event from the provider feed.
///
/// Every field is optional. The provider omits keys freely and assigns no
/// event identifiers; an event's identity is its position in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// Event timestamp as raw text, parsed leniently downstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Status description, usually Portuguese free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Location the event was recorded at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Free-form carrier remark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// One fetched tracking response.
///
/// An empty JSON object deserializes into an empty snapshot; missing or
/// `null` sections never fail the fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSnapshot {
    /// Shipping events, newest first by provider convention.
    #[serde(
        default,
        rename = "shippingCompany",
        deserialize_with = "events_or_empty"
    )]
    pub events: Vec<TrackingEvent>,

    /// Auxiliary collection-order details, passed through untouched.
    #[serde(
        default,
        rename = "clCollectOrder",
        skip_serializing_if = "Option::is_none"
    )]
    pub collect_order: Option<Map<String, Value>>,
}

impl TrackingSnapshot {
    /// The newest event, if any.
    pub fn latest_event(&self) -> Option<&TrackingEvent> {
        self.events.first()
    }

    /// Number of shipping events in the snapshot.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}

/// Accept `null` where the provider should have sent an array.
fn events_or_empty<'de, D>(deserializer: D) -> Result<Vec<TrackingEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let events: Option<Vec<TrackingEvent>> = Option::deserialize(deserializer)?;
    Ok(events.unwrap_or_default())
}
