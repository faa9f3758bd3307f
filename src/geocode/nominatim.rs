//! Nominatim (OpenStreetMap) geocoder

use super::Geocoder;
use crate::domain::Coordinates;
use crate::error::GeocodeError;

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Public Nominatim search endpoint
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Geocoder backed by a Nominatim search endpoint
///
/// One lookup, including the postcode-only fallback, shares a single
/// timeout budget.
pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    country: String,
    timeout: Duration,
}

/// One entry of a Nominatim search result; coordinates arrive as strings
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    /// Create a geocoder whose lookups finish within `timeout`
    pub fn new(
        endpoint: impl Into<String>,
        country: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            country: country.into(),
            timeout,
        })
    }

    /// Resolve a postcode, surfacing the failure reason.
    ///
    /// With a house number, a free-form address query is tried first. The
    /// structured postcode query is the fallback and only gets the time the
    /// first request left over.
    pub fn try_lookup(
        &self,
        postcode: &str,
        house_number: Option<&str>,
    ) -> Result<Coordinates, GeocodeError> {
        let postcode = normalize_postcode(postcode);
        let deadline = Instant::now() + self.timeout;

        if let Some(number) = house_number.map(str::trim).filter(|n| !n.is_empty()) {
            // Free-form queries reject structured fields, so the country goes in the text
            let query = format!("{} {}, {}", postcode, number, self.country);
            match self.search(&[("q", query.as_str())], &query, self.timeout) {
                Ok(coords) => return Ok(coords),
                Err(e) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Err(e);
                    }
                    log::debug!(
                        "Address lookup '{}' failed ({}), trying postcode only",
                        query,
                        e
                    );
                    return self.search_postcode(&postcode, remaining);
                }
            }
        }

        self.search_postcode(&postcode, self.timeout)
    }

    fn search_postcode(&self, postcode: &str, timeout: Duration) -> Result<Coordinates, GeocodeError> {
        self.search(
            &[("postalcode", postcode), ("country", self.country.as_str())],
            postcode,
            timeout,
        )
    }

    fn search(
        &self,
        query: &[(&str, &str)],
        label: &str,
        timeout: Duration,
    ) -> Result<Coordinates, GeocodeError> {
        let body = self
            .client
            .get(&self.endpoint)
            .query(query)
            .query(&[("format", "json"), ("limit", "1")])
            .timeout(timeout)
            .send()?
            .error_for_status()?
            .text()?;

        parse_search_response(&body, label)
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(&self, postcode: &str, house_number: Option<&str>) -> Option<Coordinates> {
        match self.try_lookup(postcode, house_number) {
            Ok(coords) => Some(coords),
            Err(e) => {
                log::warn!("Geocoding '{}' failed: {}", postcode, e);
                None
            }
        }
    }
}

/// Strip spaces and upper-case a postal code (`1541 ab` -> `1541AB`)
pub fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Interpret a Nominatim JSON search response, taking the first hit
pub fn parse_search_response(body: &str, query: &str) -> Result<Coordinates, GeocodeError> {
    let hits: Vec<SearchHit> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    let hit = hits
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::EmptyResult(query.to_string()))?;

    let lat: f64 = hit
        .lat
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("latitude '{}'", hit.lat)))?;
    let lon: f64 = hit
        .lon
        .parse()
        .map_err(|_| GeocodeError::Malformed(format!("longitude '{}'", hit.lon)))?;

    Coordinates::new(lat, lon).map_err(|e| GeocodeError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    const HIT: &str = r#"[{"lat": "52.4450", "lon": "4.8260"}]"#;

    /// Local HTTP endpoint answering each request target with `respond`.
    /// `None` keeps the connection open without answering.
    fn serve(respond: fn(&str) -> Option<&'static str>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&buf).to_string();
                let target = request.split_whitespace().nth(1).unwrap_or_default().to_string();
                seen.lock().unwrap().push(target.clone());

                match respond(&target) {
                    Some(body) => {
                        let _ = write!(
                            stream,
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                    }
                    None => held.push(stream),
                }
            }
        });

        (format!("http://{}/search", addr), requests)
    }

    fn geocoder(endpoint: &str, timeout: Duration) -> NominatimGeocoder {
        NominatimGeocoder::new(endpoint, "Netherlands", "geoalert-test", timeout).unwrap()
    }

    #[test]
    fn test_house_number_uses_one_free_form_request() {
        let (endpoint, requests) = serve(|_| Some(HIT));
        let coords = geocoder(&endpoint, Duration::from_secs(5))
            .try_lookup("1541 ab", Some("12"))
            .unwrap();
        assert_eq!(coords.lat(), 52.445);

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("/search?q=1541AB+12%2C+Netherlands&"));
        assert!(!requests[0].contains("country="));
        assert!(requests[0].contains("format=json"));
        assert!(requests[0].contains("limit=1"));
    }

    #[test]
    fn test_address_miss_falls_back_to_postcode() {
        let (endpoint, requests) = serve(|target| {
            if target.contains("q=") {
                Some("[]")
            } else {
                Some(HIT)
            }
        });
        let coords = geocoder(&endpoint, Duration::from_secs(5))
            .try_lookup("1541AB", Some("999"))
            .unwrap();
        assert_eq!(coords.lon(), 4.826);

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].contains("postalcode=1541AB"));
        assert!(requests[1].contains("country=Netherlands"));
        assert!(!requests[1].contains("q="));
    }

    #[test]
    fn test_postcode_only_lookup() {
        let (endpoint, requests) = serve(|_| Some(HIT));
        geocoder(&endpoint, Duration::from_secs(5))
            .try_lookup("1541AB", None)
            .unwrap();

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].starts_with("/search?postalcode=1541AB&country=Netherlands&"));
    }

    #[test]
    fn test_fallback_shares_the_timeout_budget() {
        let (endpoint, _requests) = serve(|_| None);
        let timeout = Duration::from_millis(400);

        let started = Instant::now();
        let result = geocoder(&endpoint, timeout).try_lookup("1541AB", Some("12"));
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(GeocodeError::Http(_))));
        assert!(elapsed < Duration::from_millis(750), "lookup took {:?}", elapsed);
    }

    #[test]
    fn test_normalize_postcode() {
        assert_eq!(normalize_postcode("1541 ab"), "1541AB");
        assert_eq!(normalize_postcode(" 1011AB "), "1011AB");
    }

    #[test]
    fn test_parse_first_hit() {
        let body = r#"[{"lat": "52.4450", "lon": "4.8260", "display_name": "Koog aan de Zaan"},
                       {"lat": "0", "lon": "0"}]"#;
        let coords = parse_search_response(body, "1541AB").unwrap();
        assert_eq!(coords.lat(), 52.445);
        assert_eq!(coords.lon(), 4.826);
    }

    #[test]
    fn test_parse_empty_result() {
        let result = parse_search_response("[]", "9999ZZ");
        assert!(matches!(result, Err(GeocodeError::EmptyResult(q)) if q == "9999ZZ"));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_search_response("<html>", "x"),
            Err(GeocodeError::Malformed(_))
        ));
        assert!(matches!(
            parse_search_response(r#"[{"lat": "north", "lon": "4.8"}]"#, "x"),
            Err(GeocodeError::Malformed(_))
        ));
        assert!(matches!(
            parse_search_response(r#"[{"lat": "95", "lon": "4.8"}]"#, "x"),
            Err(GeocodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_unreachable_endpoint_is_unknown() {
        let geocoder = NominatimGeocoder::new(
            "http://127.0.0.1:9/search",
            "Netherlands",
            "geoalert-test",
            Duration::from_millis(500),
        )
        .unwrap();

        assert!(geocoder.lookup("1541AB", None).is_none());
    }
}
