//! Alert event domain type
//!
//! An [`Event`] is one alert occurrence. Its `id` is the natural key: two events
//! carrying the same id describe the same real-world occurrence.

use crate::domain::geo::Coordinates;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One alert occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Globally unique id, stable across re-delivery
    pub id: String,
    /// ISO-8601 UTC origination time
    pub timestamp: String,
    /// Dispatch region
    #[serde(default)]
    pub region: String,
    /// Dispatched unit
    #[serde(default)]
    pub unit: String,
    /// Free-form message text
    #[serde(default)]
    pub text: String,
    /// Latitude, if the source event carries a location
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude, if the source event carries a location
    #[serde(default)]
    pub lon: Option<f64>,
    /// Original payload, kept verbatim
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl Event {
    /// Create an event with only the required fields set
    pub fn new(id: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            region: String::new(),
            unit: String::new(),
            text: String::new(),
            lat: None,
            lon: None,
            raw: Value::Null,
        }
    }

    /// Builder: set region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Builder: set unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Builder: set message text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder: set location
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }

    /// Builder: set the raw payload
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = raw;
        self
    }

    /// Decode an event from an arbitrary JSON object.
    ///
    /// `id` is required (string or number). Coordinates may be numbers or
    /// numeric strings; anything else is treated as absent. The whole object
    /// is retained as `raw`.
    pub fn from_json(value: Value) -> Result<Self, DomainError> {
        let obj = value.as_object().ok_or(DomainError::MissingField("id"))?;

        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(DomainError::MissingField("id")),
        };

        let event = Self {
            id,
            timestamp: string_field(obj, "timestamp"),
            region: string_field(obj, "region"),
            unit: string_field(obj, "unit"),
            text: string_field(obj, "text"),
            lat: number_field(obj, "lat"),
            lon: number_field(obj, "lon"),
            raw: Value::Null,
        };

        Ok(event.with_raw(value))
    }

    /// Location as validated coordinates.
    ///
    /// Returns `None` unless both `lat` and `lon` are present and in range.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
            _ => None,
        }
    }

    /// Full payload for audit storage.
    ///
    /// The raw payload when one was retained, otherwise the event's own fields.
    pub fn payload(&self) -> Value {
        if !self.raw.is_null() {
            return self.raw.clone();
        }
        serde_json::json!({
            "id": self.id,
            "timestamp": self.timestamp,
            "region": self.region,
            "unit": self.unit,
            "text": self.text,
            "lat": self.lat,
            "lon": self.lon,
        })
    }

    /// Timestamp cut to second precision (`YYYY-MM-DDTHH:MM:SS`)
    pub fn short_timestamp(&self) -> &str {
        truncate_chars(&self.timestamp, 19)
    }
}

/// Cut a string to at most `max` characters without splitting a code point
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
