//! Geographic domain types and the geofence filter
//!
//! Provides validated coordinates and radius types, haversine distance and
//! the [`GeoFilter`] relevance decision.

use crate::domain::event::Event;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    /// Create coordinates with range validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidCoordinates` if either value is not finite
    /// or out of range (±90 latitude, ±180 longitude).
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(DomainError::InvalidCoordinates { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    #[inline]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to another point in kilometres
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine(self.lat, self.lon, other.lat, other.lon)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}

/// Haversine great-circle distance in kilometres on a sphere of
/// [`EARTH_RADIUS_KM`].
///
/// The intermediate term is clamped to `[0, 1]` so coincident and antipodal
/// points never hit a domain error from floating-point overshoot.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Geofence radius in kilometres (positive, finite)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Radius(f64);

impl Radius {
    /// Radius used when none is configured
    pub const DEFAULT_KM: f64 = 5.0;

    /// Create a radius with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRadius` if the value is not positive and finite
    pub fn new(km: f64) -> Result<Self, DomainError> {
        if !km.is_finite() || km <= 0.0 {
            return Err(DomainError::InvalidRadius(km));
        }
        Ok(Self(km))
    }

    #[inline]
    pub const fn as_km(&self) -> f64 {
        self.0
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self(Self::DEFAULT_KM)
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.0)
    }
}

impl TryFrom<f64> for Radius {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Radius> for f64 {
    fn from(radius: Radius) -> Self {
        radius.0
    }
}

/// The subscriber's geofence
///
/// No origin means no filter: every event is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Centre of the area of interest
    pub origin: Option<Coordinates>,
    /// Radius around the origin; ignored without an origin
    pub radius: Radius,
}

impl FilterConfig {
    /// A filter that accepts everything
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// A filter around `origin`
    pub fn around(origin: Coordinates, radius: Radius) -> Self {
        Self {
            origin: Some(origin),
            radius,
        }
    }

    /// Whether an origin is configured
    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}

impl fmt::Display for FilterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(origin) => write!(f, "within {} of {}", self.radius, origin),
            None => write!(f, "no filter"),
        }
    }
}

/// Outcome of a geofence check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterDecision {
    /// No origin configured
    NoFilter,
    /// Event carries no usable location (fail-open)
    NoLocation,
    /// Inside the radius, with distance in km
    Within(f64),
    /// Outside the radius, with distance in km
    Outside(f64),
}

impl FilterDecision {
    /// Whether the event passes the filter
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Outside(_))
    }

    /// Distance to the origin, when one was computed
    pub fn distance_km(&self) -> Option<f64> {
        match self {
            Self::Within(d) | Self::Outside(d) => Some(*d),
            _ => None,
        }
    }
}

/// Geofence relevance check
pub struct GeoFilter;

impl GeoFilter {
    /// Classify an event against the filter
    pub fn evaluate(event: &Event, config: &FilterConfig) -> FilterDecision {
        let Some(origin) = config.origin else {
            return FilterDecision::NoFilter;
        };
        let Some(location) = event.coordinates() else {
            return FilterDecision::NoLocation;
        };

        let distance = origin.distance_km(&location);
        if distance <= config.radius.as_km() {
            FilterDecision::Within(distance)
        } else {
            FilterDecision::Outside(distance)
        }
    }

    /// Whether the event is relevant (inclusive boundary, fail-open on missing data)
    pub fn accept(event: &Event, config: &FilterConfig) -> bool {
        Self::evaluate(event, config).is_accepted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Coordinates {
        Coordinates::new(52.445, 4.826).unwrap()
    }

    #[test]
    fn test_haversine_coincident() {
        assert_eq!(haversine(52.3676, 4.9041, 52.3676, 4.9041), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        let there = haversine(52.445, 4.826, 51.92, 4.48);
        let back = haversine(51.92, 4.48, 52.445, 4.826);
        assert!((there - back).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let d = haversine(52.0, 4.9, 53.0, 4.9);
        assert!((d - 111.0).abs() <= 1.0, "distance was {}", d);
    }

    #[test]
    fn test_haversine_antipodal_is_finite() {
        let d = haversine(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);

        let d = haversine(90.0, 0.0, -90.0, 0.0);
        assert!(!d.is_nan());
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(52.0, 4.0).is_ok());
        assert!(Coordinates::new(91.0, 4.0).is_err());
        assert!(Coordinates::new(52.0, -181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 4.0).is_err());
    }

    #[test]
    fn test_radius_validation() {
        assert!(Radius::new(5.0).is_ok());
        assert_eq!(Radius::new(0.0), Err(DomainError::InvalidRadius(0.0)));
        assert!(Radius::new(-1.0).is_err());
        assert!(Radius::new(f64::INFINITY).is_err());
        assert_eq!(Radius::default().as_km(), 5.0);
    }

    #[test]
    fn test_no_filter_accepts_everything() {
        let config = FilterConfig::unfiltered();
        let far = Event::new("a", "t").with_location(-33.9, 151.2);
        let nowhere = Event::new("b", "t");

        assert_eq!(GeoFilter::evaluate(&far, &config), FilterDecision::NoFilter);
        assert!(GeoFilter::accept(&far, &config));
        assert!(GeoFilter::accept(&nowhere, &config));
    }

    #[test]
    fn test_missing_location_fails_open() {
        let config = FilterConfig::around(origin(), Radius::new(0.1).unwrap());
        let event = Event::new("a", "t");
        assert_eq!(
            GeoFilter::evaluate(&event, &config),
            FilterDecision::NoLocation
        );
        assert!(GeoFilter::accept(&event, &config));

        let mut half = Event::new("b", "t");
        half.lon = Some(4.9);
        assert!(GeoFilter::accept(&half, &config));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let target = Coordinates::new(52.5, 4.9).unwrap();
        let exact = origin().distance_km(&target);
        let config = FilterConfig::around(origin(), Radius::new(exact).unwrap());
        let event = Event::new("a", "t").with_location(target.lat(), target.lon());

        assert!(GeoFilter::accept(&event, &config));
    }

    #[test]
    fn test_scenario_near_and_far() {
        let config = FilterConfig::around(origin(), Radius::new(5.0).unwrap());

        let near = Event::new("near", "t").with_location(52.450, 4.830);
        let decision = GeoFilter::evaluate(&near, &config);
        assert!(decision.is_accepted());
        let d = decision.distance_km().unwrap();
        assert!(d > 0.4 && d < 0.8, "near distance was {}", d);

        let far = Event::new("far", "t").with_location(52.600, 4.900);
        let decision = GeoFilter::evaluate(&far, &config);
        assert!(!decision.is_accepted());
        let d = decision.distance_km().unwrap();
        assert!(d > 16.0 && d < 20.0, "far distance was {}", d);
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(FilterConfig::unfiltered().to_string(), "no filter");
        let config = FilterConfig::around(origin(), Radius::new(10.0).unwrap());
        assert_eq!(config.to_string(), "within 10 km of 52.44500,4.82600");
    }
}
