//! Presentation boundary
//!
//! The coordinator forwards accepted events to a [`Presenter`]. Presenters
//! only display; they never feed data back into the pipeline.

use crate::domain::event::truncate_chars;
use crate::domain::{Event, FilterConfig};

use serde_json::json;
use std::io::{self, Write};

/// Receiver of accepted events for display
pub trait Presenter {
    /// Show a newly accepted event
    fn present(&mut self, event: &Event);

    /// Show the current filter in a status area
    fn filter_changed(&mut self, _filter: &FilterConfig) {}
}

/// One-line summary: `<timestamp> — <unit> — <text>`
///
/// The timestamp is cut to seconds and the text to 80 characters.
pub fn event_line(event: &Event) -> String {
    format!(
        "{} — {} — {}",
        event.short_timestamp(),
        event.unit,
        truncate_chars(&event.text, 80)
    )
}

/// Presenter writing one line per event to a terminal or pipe
///
/// In JSON mode every event is printed as a single JSON object per line.
pub struct ConsolePresenter<W: Write> {
    out: W,
    json: bool,
}

impl ConsolePresenter<io::Stdout> {
    /// Print to stdout
    pub fn stdout(json: bool) -> Self {
        Self::new(io::stdout(), json)
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    /// Consume the presenter, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        // A closed stdout must not take the pipeline down
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            log::debug!("Presenter write failed: {}", e);
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn present(&mut self, event: &Event) {
        let line = if self.json {
            json!({
                "id": event.id,
                "timestamp": event.timestamp,
                "region": event.region,
                "unit": event.unit,
                "text": event.text,
                "lat": event.lat,
                "lon": event.lon,
            })
            .to_string()
        } else {
            event_line(event)
        };
        self.write_line(&line);
    }

    fn filter_changed(&mut self, filter: &FilterConfig) {
        if self.json {
            return;
        }
        self.write_line(&format!("Filter: {}", filter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, Radius};

    #[test]
    fn test_console_presenter_lines() {
        let mut presenter = ConsolePresenter::new(Vec::new(), false);
        let origin = Coordinates::new(52.445, 4.826).unwrap();
        presenter.filter_changed(&FilterConfig::around(origin, Radius::new(5.0).unwrap()));
        presenter.present(
            &Event::new("a", "2025-01-01T12:34:56.000Z")
                .with_unit("BR01")
                .with_text("Brandmelding"),
        );

        let out = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Filter: "));
        assert_eq!(lines[1], "2025-01-01T12:34:56 — BR01 — Brandmelding");
    }

    #[test]
    fn test_console_presenter_json() {
        let mut presenter = ConsolePresenter::new(Vec::new(), true);
        presenter.filter_changed(&FilterConfig::unfiltered());
        presenter.present(&Event::new("a", "t").with_location(52.0, 4.0));

        let out = String::from_utf8(presenter.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["lat"], 52.0);
    }

    #[test]
    fn test_event_line() {
        let event = Event::new("a", "2025-01-01T12:34:56.000Z")
            .with_unit("BR01")
            .with_text("x".repeat(100));

        let line = event_line(&event);
        assert!(line.starts_with("2025-01-01T12:34:56 — BR01 — "));
        assert!(line.ends_with(&"x".repeat(80)));
        assert!(!line.ends_with(&"x".repeat(81)));
    }
}
