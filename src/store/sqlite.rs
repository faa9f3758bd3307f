//! SQLite-backed event store

use super::traits::{EventStore, InsertOutcome};
use crate::domain::Event;
use crate::error::StoreError;

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    ts TEXT,
    region TEXT,
    unit TEXT,
    text TEXT,
    lat REAL,
    lon REAL,
    raw_json TEXT
)";

const SELECT_COLUMNS: &str = "SELECT id, ts, region, unit, text, lat, lon, raw_json FROM messages";

/// Event store on a single SQLite connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        log::debug!("Opened event store at {}", path.display());
        Ok(store)
    }

    /// Create an in-memory store
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Default database location: `<home>/.geoalert/messages.sqlite`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".geoalert")
            .join("messages.sqlite")
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(SCHEMA, [])?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
    }
}

impl EventStore for SqliteStore {
    fn insert(&self, event: &Event) -> Result<InsertOutcome, StoreError> {
        let raw_json = serde_json::to_string(&event.payload())?;
        let conn = self.lock()?;

        let changed = conn.execute(
            "INSERT OR IGNORE INTO messages (id, ts, region, unit, text, lat, lon, raw_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                event.id,
                event.timestamp,
                event.region,
                event.unit,
                event.text,
                event.lat,
                event.lon,
                raw_json
            ],
        )?;

        Ok(if changed == 0 {
            InsertOutcome::Duplicate
        } else {
            InsertOutcome::Inserted
        })
    }

    fn recent(&self, limit: Option<usize>) -> Result<Vec<Event>, StoreError> {
        let conn = self.lock()?;
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));

        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY rowid DESC LIMIT ?1",
            SELECT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![limit], read_row)?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row?.into_event());
        }
        Ok(events)
    }

    fn get(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                read_row,
            )
            .optional()?;
        Ok(row.map(StoredRow::into_event))
    }

    fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

/// Column values as read, before the payload is parsed
struct StoredRow {
    id: String,
    ts: Option<String>,
    region: Option<String>,
    unit: Option<String>,
    text: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    raw_json: Option<String>,
}

impl StoredRow {
    fn into_event(self) -> Event {
        let raw = match self.raw_json {
            Some(json) => serde_json::from_str(&json).unwrap_or(Value::String(json)),
            None => Value::Null,
        };

        Event {
            id: self.id,
            timestamp: self.ts.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            unit: self.unit.unwrap_or_default(),
            text: self.text.unwrap_or_default(),
            lat: self.lat,
            lon: self.lon,
            raw,
        }
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        ts: row.get(1)?,
        region: row.get(2)?,
        unit: row.get(3)?,
        text: row.get(4)?,
        lat: row.get(5)?,
        lon: row.get(6)?,
        raw_json: row.get(7)?,
    })
}
