//! geoalert - location-filtered emergency dispatch alerts
//!
//! This library provides a small alert pipeline: a background source feeds
//! dispatch events into a channel, and a coordinator drains it on a fixed
//! cadence, keeps the events inside the subscriber's geofence, stores them
//! in SQLite and announces them.
//!
//! # Modules
//!
//! - [`alerts`]: Notification channels and dispatcher
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Events, coordinates and the geofence
//! - [`error`]: Error types
//! - [`geocode`]: Postcode to coordinates lookup
//! - [`services`]: Channel, coordinator and filter services
//! - [`source`]: Event sources and the acquisition worker
//! - [`store`]: Persistent event store

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod geocode;
pub mod services;
pub mod source;
pub mod store;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
