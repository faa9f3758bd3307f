//! Persistent event store
//!
//! Durable, idempotent record of accepted events. Writes are insert-or-ignore
//! keyed by event id; reads return the most recently inserted records first.

pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStore;
pub use traits::{EventStore, InsertOutcome};
