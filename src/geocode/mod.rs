//! Postcode geocoding
//!
//! Resolves a postal code (and optional house number) to coordinates. Lookups
//! never raise: any failure is reported as "unknown" (`None`) and logged.

mod nominatim;

pub use nominatim::{normalize_postcode, parse_search_response, NominatimGeocoder, DEFAULT_ENDPOINT};

use crate::domain::Coordinates;

/// Postcode-to-coordinate lookup
pub trait Geocoder {
    /// Resolve a postcode, returning `None` when the location is unknown
    fn lookup(&self, postcode: &str, house_number: Option<&str>) -> Option<Coordinates>;
}
