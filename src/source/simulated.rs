//! Simulated alert feed
//!
//! Emits one synthetic alert per cycle, jittered around a configured point.

use super::EventSource;
use crate::domain::Event;
use crate::error::SourceError;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde_json::json;

/// Parameters for synthetic events
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    /// Base latitude; jitter is added on top
    pub center_lat: f64,
    /// Base longitude; jitter is added on top
    pub center_lon: f64,
    /// Jitter range in degrees, applied independently to both axes
    pub jitter_degrees: f64,
    pub region: String,
    pub unit: String,
    pub text: String,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            center_lat: 52.445,
            center_lon: 4.826,
            jitter_degrees: 0.02,
            region: "Zaanstreek-Waterland".to_string(),
            unit: "BR01".to_string(),
            text: "Brandmelding test".to_string(),
        }
    }
}

/// Source producing synthetic alerts
pub struct SimulatedSource {
    settings: SimulationSettings,
}

impl SimulatedSource {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }

    fn generate(&self) -> Event {
        let mut rng = rand::thread_rng();
        let now = Utc::now();

        let id = format!(
            "p2000-{}-{}",
            now.timestamp_millis(),
            rng.gen_range(0..=9999)
        );
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
        let lat = self.settings.center_lat + rng.gen::<f64>() * self.settings.jitter_degrees;
        let lon = self.settings.center_lon + rng.gen::<f64>() * self.settings.jitter_degrees;

        let raw = json!({
            "id": id,
            "timestamp": timestamp,
            "region": self.settings.region,
            "unit": self.settings.unit,
            "text": self.settings.text,
            "lat": lat,
            "lon": lon,
        });

        Event::new(id, timestamp)
            .with_region(self.settings.region.clone())
            .with_unit(self.settings.unit.clone())
            .with_text(self.settings.text.clone())
            .with_location(lat, lon)
            .with_raw(raw)
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new(SimulationSettings::default())
    }
}

impl EventSource for SimulatedSource {
    fn poll(&mut self) -> Result<Vec<Event>, SourceError> {
        Ok(vec![self.generate()])
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
