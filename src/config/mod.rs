//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::domain::{Coordinates, Radius};
use crate::error::ConfigError;
use crate::geocode::DEFAULT_ENDPOINT;
use crate::source::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Event source settings
    pub source: SourceConfig,
    /// Geofence settings
    pub filter: FilterSettings,
    /// Event store settings
    pub store: StoreConfig,
    /// Notification settings
    pub notify: NotifyConfig,
    /// Geocoding settings
    pub geocode: GeocodeConfig,
}

impl Config {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.tick_ms == 0 {
            return Err(invalid("general.tick_ms", "must be greater than 0"));
        }
        if self.source.poll_interval_seconds == 0 {
            return Err(invalid(
                "source.poll_interval_seconds",
                "must be greater than 0",
            ));
        }
        if self.source.kind == SourceKind::Feed && self.source.feed_url.is_none() {
            return Err(ConfigError::MissingField("source.feed_url".to_string()));
        }
        if self.geocode.timeout_seconds == 0 {
            return Err(invalid("geocode.timeout_seconds", "must be greater than 0"));
        }
        self.filter.radius()?;
        self.filter.origin()?;
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Coordinator drain interval in milliseconds
    pub tick_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            tick_ms: 300,
        }
    }
}

impl GeneralConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Which event source to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Synthetic alerts
    #[default]
    Simulated,
    /// HTTP JSON feed
    Feed,
}

/// Event source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Seconds between acquisition cycles
    pub poll_interval_seconds: u64,
    /// Feed endpoint (required for `kind = "feed"`)
    pub feed_url: Option<String>,
    /// Feed request timeout in seconds
    pub request_timeout_seconds: u64,
    pub sim_center_lat: f64,
    pub sim_center_lon: f64,
    pub sim_jitter_degrees: f64,
    pub sim_region: String,
    pub sim_unit: String,
    pub sim_text: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        let sim = SimulationSettings::default();
        Self {
            kind: SourceKind::Simulated,
            poll_interval_seconds: 3,
            feed_url: None,
            request_timeout_seconds: 10,
            sim_center_lat: sim.center_lat,
            sim_center_lon: sim.center_lon,
            sim_jitter_degrees: sim.jitter_degrees,
            sim_region: sim.region,
            sim_unit: sim.unit,
            sim_text: sim.text,
        }
    }
}

impl SourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Convert to simulation parameters
    pub fn simulation(&self) -> SimulationSettings {
        SimulationSettings {
            center_lat: self.sim_center_lat,
            center_lon: self.sim_center_lon,
            jitter_degrees: self.sim_jitter_degrees,
            region: self.sim_region.clone(),
            unit: self.sim_unit.clone(),
            text: self.sim_text.clone(),
        }
    }
}

/// Geofence configuration
///
/// Either `lat`/`lon` (used directly) or `postcode` (geocoded at startup).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub postcode: Option<String>,
    pub house_number: Option<String>,
    pub radius_km: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            postcode: None,
            house_number: None,
            radius_km: Radius::DEFAULT_KM,
            lat: None,
            lon: None,
        }
    }
}

impl FilterSettings {
    /// Convert to a Radius domain object
    pub fn radius(&self) -> Result<Radius, ConfigError> {
        Ok(Radius::new(self.radius_km)?)
    }

    /// Explicit origin, if both coordinates are configured
    pub fn origin(&self) -> Result<Option<Coordinates>, ConfigError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinates::new(lat, lon)?)),
            (None, None) => Ok(None),
            _ => Err(invalid("filter.lat/filter.lon", "set both or neither")),
        }
    }
}

/// Event store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; defaults to `<home>/.geoalert/messages.sqlite`
    pub path: Option<PathBuf>,
}

/// Notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Play a sound for every accepted event
    pub sound: bool,
    /// Sound file; defaults to `<config_dir>/geoalert/alert.wav`
    pub sound_file: Option<PathBuf>,
    /// Audio player command; platform default when unset
    pub player: Option<String>,
    /// Ring the terminal bell and print an alert banner
    pub terminal: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            sound: true,
            sound_file: None,
            player: None,
            terminal: true,
        }
    }
}

/// Geocoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    pub endpoint: String,
    pub country: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            country: "Netherlands".to_string(),
            user_agent: concat!("geoalert/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_seconds: 8,
        }
    }
}

impl GeocodeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
