//! Unified error types for geoalert
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from domain type validation
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    /// Error from the persistent store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from an event source
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Error from the geocoding lookup
    #[error("Geocode error: {0}")]
    Geocode(#[from] GeocodeError),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the persistent event store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite operation failed
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Raw payload could not be serialized or parsed
    #[error("Payload serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Database directory could not be created
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store cannot accept writes right now
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors from a single event source cycle
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request to the feed failed
    #[error("Feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned something that is not an event list
    #[error("Failed to decode feed: {0}")]
    Decode(String),

    /// The consuming side of the channel is gone
    #[error("Event channel disconnected")]
    Disconnected,
}

/// Errors from a geocoding lookup
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// HTTP request failed or timed out
    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Lookup succeeded but found nothing
    #[error("No location found for '{0}'")]
    EmptyResult(String),

    /// Response could not be interpreted
    #[error("Malformed geocoding response: {0}")]
    Malformed(String),
}

/// Errors from notification backends
///
/// These never leave the notification layer; the dispatcher logs and drops them.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Sound resource file is missing
    #[error("Sound resource not found: {0}")]
    MissingResource(String),

    /// No audio backend is available on this platform
    #[error("No audio backend available")]
    NoBackend,

    /// Backend process or terminal write failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from domain type validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Radius must be a positive, finite number of kilometres
    #[error("Invalid radius: {0} km (must be positive)")]
    InvalidRadius(f64),

    /// Coordinates out of range or not finite
    #[error("Invalid coordinates: {lat}, {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },

    /// Event payload lacks a required field
    #[error("Event is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required config field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Filter setup attempted without a postcode
    #[error("Enter a postcode first")]
    EmptyPostcode,

    /// Geocoding could not place the postcode
    #[error("Could not locate postcode '{0}'")]
    UnresolvedPostcode(String),

    /// Invalid filter parameter
    #[error("Invalid filter: {0}")]
    Domain(#[from] DomainError),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_display() {
        let err = DomainError::InvalidRadius(-5.0);
        assert_eq!(err.to_string(), "Invalid radius: -5 km (must be positive)");
    }

    #[test]
    fn test_unresolved_postcode_display() {
        let err = ConfigError::UnresolvedPostcode("1541AB".to_string());
        assert!(err.to_string().contains("1541AB"));
    }

    #[test]
    fn test_missing_field_display() {
        let err = DomainError::MissingField("id");
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn test_error_conversion() {
        let store_err = StoreError::Unavailable("disk full".to_string());
        let app_err: AppError = store_err.into();
        assert!(matches!(app_err, AppError::Store(_)));

        let config_err: ConfigError = DomainError::InvalidRadius(0.0).into();
        assert!(matches!(config_err, ConfigError::Domain(_)));
    }

    #[test]
    fn test_malformed_config_is_a_toml_error() {
        let parse_err = toml::from_str::<toml::Value>("[general\nverbose = ").unwrap_err();
        let app_err: AppError = ConfigError::from(parse_err).into();
        assert!(matches!(app_err, AppError::Config(ConfigError::TomlError(_))));
        assert!(app_err.to_string().contains("TOML"));
    }
}
