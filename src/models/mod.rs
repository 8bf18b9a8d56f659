// src/models/mod.rs

//! Domain models for the tracker application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod locale;
mod snapshot;
mod view;

// Re-export all public types
pub use config::{ApiConfig, Config, PackageConfig, RefreshConfig, StateConfig};
pub use locale::{ErrorMessages, LocaleConfig, Messages};
pub use snapshot::{TrackingEvent, TrackingSnapshot};
pub use view::{DELIVERY_INDICATORS, EventRecord, TrackingView};
