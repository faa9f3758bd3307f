//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile, SourceKind};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file.
    ///
    /// An explicitly named file must exist and parse; default locations are
    /// best-effort.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI tick interval
    pub fn with_tick_ms(mut self, tick_ms: Option<u64>) -> Self {
        if let Some(t) = tick_ms {
            self.config.general.tick_ms = t;
        }
        self
    }

    /// Override with CLI poll interval
    pub fn with_poll_interval(mut self, seconds: Option<u64>) -> Self {
        if let Some(s) = seconds {
            self.config.source.poll_interval_seconds = s;
        }
        self
    }

    /// Override with CLI source selection
    pub fn with_source(mut self, kind: Option<SourceKind>, feed_url: Option<String>) -> Self {
        if let Some(url) = feed_url {
            self.config.source.feed_url = Some(url);
            self.config.source.kind = SourceKind::Feed;
        }
        if let Some(k) = kind {
            self.config.source.kind = k;
        }
        self
    }

    /// Override with CLI postcode
    pub fn with_postcode(mut self, postcode: Option<String>, house_number: Option<String>) -> Self {
        if let Some(pc) = postcode {
            self.config.filter.postcode = Some(pc);
            self.config.filter.house_number = house_number;
        }
        self
    }

    /// Override with CLI origin coordinates
    pub fn with_origin(mut self, lat: Option<f64>, lon: Option<f64>) -> Self {
        if lat.is_some() || lon.is_some() {
            self.config.filter.lat = lat;
            self.config.filter.lon = lon;
        }
        self
    }

    /// Override with CLI radius
    pub fn with_radius(mut self, radius_km: Option<f64>) -> Self {
        if let Some(r) = radius_km {
            self.config.filter.radius_km = r;
        }
        self
    }

    /// Override with CLI database path
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.config.store.path = Some(p);
        }
        self
    }

    /// Override with CLI sound settings
    pub fn with_sound(mut self, no_sound: bool, sound_file: Option<PathBuf>) -> Self {
        if no_sound {
            self.config.notify.sound = false;
        }
        if let Some(f) = sound_file {
            self.config.notify.sound_file = Some(f);
        }
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
