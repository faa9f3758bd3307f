//! Configuration file loading
//!
//! Handles loading configuration from TOML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Option<Config> {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
                }
            }
        }
        None
    }

    /// Get default configuration file paths
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // User config
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("geoalert").join("config.toml"));
        }

        // Current directory
        paths.push(PathBuf::from("geoalert.toml"));
        paths.push(PathBuf::from(".geoalert.toml"));

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_paths_not_empty() {
        let paths = ConfigFile::default_paths();
        assert!(paths.iter().any(|p| p.ends_with("geoalert.toml")));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general]\ntick_ms = 100\n\n[notify]\nsound = false").unwrap();

        let config = ConfigFile::load(file.path()).unwrap();
        assert_eq!(config.general.tick_ms, 100);
        assert!(!config.notify.sound);
        assert!(config.notify.terminal);
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[general\ntick_ms = ").unwrap();
        assert!(matches!(
            ConfigFile::load(file.path()),
            Err(ConfigError::TomlError(_))
        ));
    }
}
