//! Log-only publisher implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::PackageConfig;
use crate::platform::{FieldUpdate, Notification, StatePublisher};

/// Publishes everything as log lines.
///
/// Default sink for dry runs, where fetching and diffing should happen
/// without touching the state directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl StatePublisher for LogPublisher {
    async fn publish_fields(&self, package: &PackageConfig, updates: &[FieldUpdate]) -> Result<()> {
        for update in updates {
            log::info!(
                "[{}] {} = {}",
                package.tracking_number,
                update.key,
                update.value
            );
        }
        Ok(())
    }

    async fn publish_notification(&self, notification: &Notification) -> Result<()> {
        log::info!("[notification {}] {}", notification.id, notification.title);
        for line in notification.message.lines() {
            log::info!("  {}", line);
        }
        Ok(())
    }

    async fn publish_availability(&self, package: &PackageConfig, available: bool) -> Result<()> {
        log::info!("[{}] available = {}", package.tracking_number, available);
        Ok(())
    }
}
