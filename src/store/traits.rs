//! Trait definitions for event storage
//!
//! These traits abstract over SQLite to enable testing with mocks.

use crate::domain::Event;
use crate::error::StoreError;

/// Result of an insert-or-ignore write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new record was written
    Inserted,
    /// A record with this id already existed; nothing changed
    Duplicate,
}

/// Durable, idempotent event storage
pub trait EventStore: Send {
    /// Store an event unless its id is already present.
    ///
    /// Returns only after the write is durable or has failed. A duplicate id
    /// is not an error.
    fn insert(&self, event: &Event) -> Result<InsertOutcome, StoreError>;

    /// Most recently inserted records first, optionally limited
    fn recent(&self, limit: Option<usize>) -> Result<Vec<Event>, StoreError>;

    /// Look up a single record by id
    fn get(&self, id: &str) -> Result<Option<Event>, StoreError>;

    /// Number of stored records
    fn count(&self) -> Result<usize, StoreError>;
}
