//! Geofence configuration service
//!
//! Holds the current [`FilterConfig`] shared between the configuring side and
//! the coordinator, and implements the postcode configuration step.

use crate::domain::{Coordinates, FilterConfig, Radius};
use crate::error::ConfigError;
use crate::geocode::{normalize_postcode, Geocoder};

use std::fmt;
use std::sync::{Arc, RwLock};

/// Shared handle to the current filter
#[derive(Debug, Clone, Default)]
pub struct FilterHandle {
    inner: Arc<RwLock<FilterConfig>>,
}

impl FilterHandle {
    /// Copy of the current filter
    pub fn snapshot(&self) -> FilterConfig {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replace the current filter
    pub fn set(&self, config: FilterConfig) {
        match self.inner.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}

/// A successfully activated postcode filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilterActivation {
    /// Normalised postcode
    pub postcode: String,
    pub origin: Coordinates,
    pub radius: Radius,
}

impl fmt::Display for FilterActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Filter active around {} — radius {} km — coords: {:.5},{:.5}",
            self.postcode,
            self.radius.as_km(),
            self.origin.lat(),
            self.origin.lon()
        )
    }
}

/// Filter configuration entry point
#[derive(Debug, Clone, Default)]
pub struct FilterService {
    handle: FilterHandle,
}

impl FilterService {
    /// Start with no filter (accept everything)
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for readers of the filter
    pub fn handle(&self) -> FilterHandle {
        self.handle.clone()
    }

    /// Current filter
    pub fn current(&self) -> FilterConfig {
        self.handle.snapshot()
    }

    /// Set the origin directly
    pub fn set_origin(&self, origin: Coordinates, radius: Radius) -> FilterConfig {
        let config = FilterConfig::around(origin, radius);
        self.handle.set(config);
        log::info!("Filter set: {}", config);
        config
    }

    /// Geocode a postcode and make it the filter origin.
    ///
    /// # Errors
    /// `EmptyPostcode`, an invalid radius, or `UnresolvedPostcode`. On any
    /// error the current filter stays as it was.
    pub fn configure_postcode<G: Geocoder + ?Sized>(
        &self,
        geocoder: &G,
        postcode: &str,
        house_number: Option<&str>,
        radius_km: f64,
    ) -> Result<FilterActivation, ConfigError> {
        let postcode = normalize_postcode(postcode);
        if postcode.is_empty() {
            return Err(ConfigError::EmptyPostcode);
        }
        let radius = Radius::new(radius_km)?;

        let house_number = house_number.map(str::trim).filter(|n| !n.is_empty());
        let origin = geocoder
            .lookup(&postcode, house_number)
            .ok_or_else(|| ConfigError::UnresolvedPostcode(postcode.clone()))?;

        self.handle.set(FilterConfig::around(origin, radius));

        let activation = FilterActivation {
            postcode,
            origin,
            radius,
        };
        log::info!("{}", activation);
        Ok(activation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FixedGeocoder;

    fn origin() -> Coordinates {
        Coordinates::new(52.445, 4.826).unwrap()
    }

    #[test]
    fn test_starts_unfiltered() {
        let service = FilterService::new();
        assert!(!service.current().is_active());
    }

    #[test]
    fn test_configure_postcode_success() {
        let service = FilterService::new();
        let geocoder = FixedGeocoder::resolving(origin());

        let activation = service
            .configure_postcode(&geocoder, "1541 ab", Some("12"), 10.0)
            .unwrap();

        assert_eq!(activation.postcode, "1541AB");
        assert_eq!(service.current().origin, Some(origin()));
        assert_eq!(service.current().radius.as_km(), 10.0);
        assert_eq!(
            activation.to_string(),
            "Filter active around 1541AB — radius 10 km — coords: 52.44500,4.82600"
        );
        assert_eq!(
            geocoder.requests(),
            vec![("1541AB".to_string(), Some("12".to_string()))]
        );
    }

    #[test]
    fn test_empty_postcode_rejected() {
        let service = FilterService::new();
        let geocoder = FixedGeocoder::resolving(origin());

        let result = service.configure_postcode(&geocoder, "   ", None, 5.0);
        assert!(matches!(result, Err(ConfigError::EmptyPostcode)));
        assert!(geocoder.requests().is_empty());
    }

    #[test]
    fn test_unresolved_keeps_previous_filter() {
        let service = FilterService::new();
        let previous = service.set_origin(origin(), Radius::new(5.0).unwrap());

        let result = service.configure_postcode(&FixedGeocoder::unknown(), "9999ZZ", None, 20.0);
        assert!(matches!(result, Err(ConfigError::UnresolvedPostcode(pc)) if pc == "9999ZZ"));
        assert_eq!(service.current(), previous);
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let service = FilterService::new();
        let geocoder = FixedGeocoder::resolving(origin());
        let result = service.configure_postcode(&geocoder, "1541AB", None, 0.0);
        assert!(matches!(result, Err(ConfigError::Domain(_))));
        assert!(!service.current().is_active());
    }

    #[test]
    fn test_handle_sees_reconfiguration() {
        let service = FilterService::new();
        let handle = service.handle();

        service.set_origin(origin(), Radius::new(5.0).unwrap());
        assert!(handle.snapshot().is_active());

        service.set_origin(origin(), Radius::new(12.5).unwrap());
        assert_eq!(handle.snapshot().radius.as_km(), 12.5);
    }
}
