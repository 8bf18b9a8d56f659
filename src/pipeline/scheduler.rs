//! Interval-driven refresh scheduling.
//!
//! Spawns one refresh loop per configured package; a slow provider only
//! delays that package, never the others.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::refresh::PackageMonitor;
use crate::platform::StatePublisher;
use crate::services::TrackingApiClient;

/// Spawn refresh loops for every configured package and run until the
/// process is stopped.
pub async fn run_tracker(config: &Config, publisher: Arc<dyn StatePublisher>) -> Result<()> {
    let mut handles = Vec::new();

    for package in &config.packages {
        let client = TrackingApiClient::new(&config.api, package.tracking_number.clone())?;
        let period = package.refresh_period(&config.refresh);
        let monitor =
            PackageMonitor::new(package.clone(), Box::new(client), Arc::clone(&publisher));

        log::info!(
            "Tracking {} ({}) every {} minute(s)",
            package.name,
            package.tracking_number,
            period.as_secs() / 60
        );
        handles.push(tokio::spawn(refresh_loop(monitor, period)));
    }

    future::join_all(handles).await;
    Ok(())
}

/// Drive one package forever: tick, refresh, log failures.
///
/// The first tick fires immediately. A refresh outlasting the period
/// delays the next tick rather than skipping it or running it early.
async fn refresh_loop(mut monitor: PackageMonitor, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match monitor.refresh().await {
            Ok(()) => log::debug!(
                "Refresh complete for {}",
                monitor.package().tracking_number
            ),
            Err(error) => log::error!(
                "Refresh failed for {}: {}",
                monitor.package().tracking_number,
                error
            ),
        }
    }
}
