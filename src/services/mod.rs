//! Service layer for the tracker application.
//!
//! This module contains the outward-facing plumbing:
//! - Tracking payload fetching (`TrackingApiClient`)
//! - The `TrackingSource` seam the refresh pipeline polls through

mod client;

pub use client::{TrackingApiClient, TrackingSource};
