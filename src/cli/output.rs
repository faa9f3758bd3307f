//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::event::truncate_chars;
use crate::domain::{Coordinates, Event};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Stored alert for display
#[derive(Debug, Clone, Serialize)]
pub struct AlertEntry {
    pub id: String,
    pub timestamp: String,
    pub region: String,
    pub unit: String,
    pub text: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl From<&Event> for AlertEntry {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            timestamp: event.timestamp.clone(),
            region: event.region.clone(),
            unit: event.unit.clone(),
            text: event.text.clone(),
            lat: event.lat,
            lon: event.lon,
        }
    }
}

impl AlertEntry {
    fn short_timestamp(&self) -> &str {
        truncate_chars(&self.timestamp, 19)
    }

    fn location(&self) -> String {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => format!("{:.5},{:.5}", lat, lon),
            _ => "-".to_string(),
        }
    }
}

impl TableDisplay for AlertEntry {
    fn to_table(&self) -> String {
        format!(
            "  {:<19}  {:<8} {:<22} {:<20} {}",
            self.short_timestamp(),
            truncate_chars(&self.unit, 8),
            self.location(),
            truncate_chars(&self.region, 20),
            truncate_chars(&self.text, 80)
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.id, self.unit)
    }
}

/// Recent alerts list for display
#[derive(Debug, Clone, Serialize)]
pub struct AlertList {
    pub total_stored: usize,
    pub alerts: Vec<AlertEntry>,
}

impl TableDisplay for AlertList {
    fn to_table(&self) -> String {
        let mut output = format!(
            "Showing {} of {} stored alerts\n\n",
            self.alerts.len(),
            self.total_stored
        );

        if self.alerts.is_empty() {
            output.push_str("  No alerts stored yet\n");
            return output;
        }

        output.push_str(&format!(
            "  {:<19}  {:<8} {:<22} {:<20} {}\n",
            "Time", "Unit", "Location", "Region", "Text"
        ));
        output.push_str("  ────────────────────────────────────────────────────────────────────────────\n");

        for alert in &self.alerts {
            output.push_str(&alert.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        self.alerts
            .iter()
            .map(|a| a.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Geocoding result display
#[derive(Debug, Clone, Serialize)]
pub struct GeocodeResult {
    pub postcode: String,
    pub house_number: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodeResult {
    pub fn new(postcode: String, house_number: Option<String>, coords: Coordinates) -> Self {
        Self {
            postcode,
            house_number,
            lat: coords.lat(),
            lon: coords.lon(),
        }
    }
}

impl TableDisplay for GeocodeResult {
    fn to_table(&self) -> String {
        let place = match &self.house_number {
            Some(number) => format!("{} {}", self.postcode, number),
            None => self.postcode.clone(),
        };
        format!("{}\n  Coordinates: {:.5},{:.5}", place, self.lat, self.lon)
    }

    fn to_compact(&self) -> String {
        format!("{:.5},{:.5}", self.lat, self.lon)
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl Message {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}
