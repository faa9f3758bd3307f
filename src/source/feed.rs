//! HTTP feed source
//!
//! Polls an endpoint returning a JSON array of event objects. The payload is
//! decoded field by field so unknown extra keys survive in `Event::raw`.

use super::EventSource;
use crate::domain::Event;
use crate::error::SourceError;

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Source polling a remote JSON feed
pub struct FeedSource {
    client: Client,
    url: String,
}

impl FeedSource {
    /// Create a feed source with a per-request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("geoalert/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Endpoint being polled
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl EventSource for FeedSource {
    fn poll(&mut self) -> Result<Vec<Event>, SourceError> {
        let body = self
            .client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .text()?;

        parse_feed(&body)
    }

    fn name(&self) -> &str {
        "feed"
    }
}

/// Decode a feed body into events.
///
/// Accepts either a bare array or an object with an `events` array. Entries
/// without an id are skipped with a warning.
pub fn parse_feed(body: &str) -> Result<Vec<Event>, SourceError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("events") {
            Some(Value::Array(items)) => items,
            _ => return Err(SourceError::Decode("expected an 'events' array".to_string())),
        },
        _ => return Err(SourceError::Decode("expected a JSON array".to_string())),
    };

    let mut events = Vec::with_capacity(items.len());
    for item in items {
        match Event::from_json(item) {
            Ok(event) => events.push(event),
            Err(e) => log::warn!("Skipping feed entry: {}", e),
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_array() {
        let body = r#"[
            {"id": "a", "timestamp": "2025-01-01T00:00:00Z", "unit": "BR01", "lat": 52.4, "lon": 4.8},
            {"id": "b", "timestamp": "2025-01-01T00:00:01Z", "text": "no location"}
        ]"#;

        let events = parse_feed(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].unit, "BR01");
        assert!(events[0].coordinates().is_some());
        assert!(events[1].coordinates().is_none());
    }

    #[test]
    fn test_parse_feed_wrapped() {
        let body = r#"{"events": [{"id": "a"}]}"#;
        let events = parse_feed(body).unwrap();
        assert_eq!(events[0].id, "a");
    }

    #[test]
    fn test_parse_feed_skips_entries_without_id() {
        let body = r#"[{"text": "orphan"}, {"id": "ok"}]"#;
        let events = parse_feed(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "ok");
    }

    #[test]
    fn test_parse_feed_rejects_garbage() {
        assert!(matches!(parse_feed("not json"), Err(SourceError::Decode(_))));
        assert!(matches!(parse_feed("42"), Err(SourceError::Decode(_))));
        assert!(matches!(
            parse_feed(r#"{"items": []}"#),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_feed_source_creation() {
        let source = FeedSource::new("http://localhost:9/feed", Duration::from_secs(1)).unwrap();
        assert_eq!(source.url(), "http://localhost:9/feed");
        assert_eq!(source.name(), "feed");
    }
}
