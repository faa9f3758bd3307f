//! Domain models for geoalert
//!
//! This module contains the alert event and geofence types.
//! Types are validated on construction (fail-fast pattern).

pub mod event;
pub mod geo;

pub use event::Event;
pub use geo::{haversine, Coordinates, FilterConfig, FilterDecision, GeoFilter, Radius};
