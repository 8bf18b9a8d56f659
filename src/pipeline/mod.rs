//! Refresh pipeline for tracker operations.
//!
//! - `detect_new_event`: Count-based diff between snapshots
//! - `PackageMonitor`: One fetch-diff-publish cycle per package
//! - `run_tracker`: Interval scheduling across all packages

pub mod diff;
pub mod refresh;
pub mod scheduler;

pub use diff::{NewEventInfo, detect_new_event};
pub use refresh::{PackageMonitor, build_update_notification};
pub use scheduler::run_tracker;
