//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod geocode;
pub mod recent;
pub mod watch;

pub use geocode::run_geocode;
pub use recent::run_recent;
pub use watch::run_watch;

use crate::config::{Config, ConfigBuilder, GeocodeConfig};
use crate::error::ConfigError;
use crate::geocode::NominatimGeocoder;
use crate::store::SqliteStore;
use crate::Result;
use std::path::PathBuf;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<String>,
    pub db: Option<PathBuf>,
    pub verbose: bool,
}

impl GlobalOptions {
    /// Start a config builder from the config file and global flags
    pub fn builder(&self) -> std::result::Result<ConfigBuilder, ConfigError> {
        Ok(ConfigBuilder::new()
            .with_file(self.config.as_deref())?
            .with_verbose(self.verbose.then_some(true))
            .with_db_path(self.db.clone()))
    }

    /// Validate the merged configuration and apply its verbosity
    pub fn finish(&self, builder: ConfigBuilder) -> std::result::Result<Config, ConfigError> {
        let config = builder.build()?;
        let level = log_level(config.general.verbose);
        if level > log::max_level() {
            log::set_max_level(level);
        }
        Ok(config)
    }
}

/// Logging ceiling for a verbosity setting
pub fn log_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

/// Database file for a configuration
pub(crate) fn store_path(config: &Config) -> PathBuf {
    config
        .store
        .path
        .clone()
        .unwrap_or_else(SqliteStore::default_path)
}

pub(crate) fn open_geocoder(config: &GeocodeConfig) -> Result<NominatimGeocoder> {
    Ok(NominatimGeocoder::new(
        config.endpoint.clone(),
        config.country.clone(),
        &config.user_agent,
        config.timeout(),
    )?)
}
