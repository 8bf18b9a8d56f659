//! Per-package refresh cycle.
//!
//! One `PackageMonitor` owns everything a single package needs: the
//! tracking source to poll, the publisher to report into and the
//! previous snapshot the differ runs against.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{PackageConfig, TrackingSnapshot, TrackingView};
use crate::pipeline::diff::{NewEventInfo, detect_new_event};
use crate::platform::entities::field_updates;
use crate::platform::{Notification, StatePublisher};
use crate::services::TrackingSource;

/// Driver for one tracked package.
pub struct PackageMonitor {
    package: PackageConfig,
    source: Box<dyn TrackingSource>,
    publisher: Arc<dyn StatePublisher>,
    previous: Option<TrackingSnapshot>,
}

impl PackageMonitor {
    /// Create a monitor with no previous snapshot.
    pub fn new(
        package: PackageConfig,
        source: Box<dyn TrackingSource>,
        publisher: Arc<dyn StatePublisher>,
    ) -> Self {
        Self {
            package,
            source,
            publisher,
            previous: None,
        }
    }

    /// The package this monitor drives.
    pub fn package(&self) -> &PackageConfig {
        &self.package
    }

    /// Run one refresh cycle.
    ///
    /// On a successful fetch the differ sees the stored previous snapshot
    /// before it is replaced, at most one notification goes out, and the
    /// full derived field set is published with availability flagged
    /// fresh. A failed fetch flags the package stale and leaves the
    /// previous snapshot and last published fields untouched.
    pub async fn refresh(&mut self) -> Result<()> {
        let snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                if let Err(publish_error) = self
                    .publisher
                    .publish_availability(&self.package, false)
                    .await
                {
                    log::warn!(
                        "Could not flag {} stale: {}",
                        self.package.tracking_number,
                        publish_error
                    );
                }
                return Err(error);
            }
        };

        if let Some(info) = detect_new_event(self.previous.as_ref(), &snapshot) {
            log::info!(
                "New tracking event for {}: {}",
                self.package.tracking_number,
                info.status
            );
            let notification = build_update_notification(&self.package, &info);
            self.publisher.publish_notification(&notification).await?;
        }

        let view = TrackingView::from_snapshot(&snapshot);
        self.previous = Some(snapshot);

        let updates = field_updates(&self.package, &view);
        self.publisher.publish_fields(&self.package, &updates).await?;
        self.publisher
            .publish_availability(&self.package, true)
            .await?;
        Ok(())
    }
}

/// Build the user notification for a newly appended event.
pub fn build_update_notification(package: &PackageConfig, info: &NewEventInfo) -> Notification {
    Notification {
        id: notification_id(package),
        title: format!("📦 Package Update: {}", package.name),
        message: format!(
            "**Status:** {}\n**Location:** {}\n**Tracking:** {}\n**Updated:** {}\n\n\
             Your package has a new tracking update!",
            info.status, info.location, package.tracking_number, info.date
        ),
    }
}

/// Stable notification id, so repeated updates for the same package
/// replace each other instead of stacking.
fn notification_id(package: &PackageConfig) -> String {
    format!(
        "anjun_{}_{}_update",
        package.name.to_lowercase().replace(' ', "_"),
        package.tracking_number.to_lowercase()
    )
}
