//! Event acquisition
//!
//! An [`EventSource`] produces raw alert events one cycle at a time. The
//! [`SourceWorker`] drives a source on its own thread, suppresses ids it has
//! already emitted and pushes the rest onto the event channel.
//!
//! Two sources ship with the crate:
//!
//! - [`SimulatedSource`]: synthetic alerts around a fixed point
//! - [`FeedSource`]: polls an HTTP endpoint returning a JSON list of events

pub mod feed;
pub mod simulated;
pub mod worker;

pub use feed::FeedSource;
pub use simulated::{SimulatedSource, SimulationSettings};
pub use worker::{SeenIds, SourceWorker};

use crate::domain::Event;
use crate::error::SourceError;

/// A producer of alert events
///
/// Implementations do not need to deduplicate; the worker does that.
pub trait EventSource: Send {
    /// Run one acquisition cycle, returning zero or more events
    fn poll(&mut self) -> Result<Vec<Event>, SourceError>;

    /// Source name for logging
    fn name(&self) -> &str;
}

impl EventSource for Box<dyn EventSource> {
    fn poll(&mut self) -> Result<Vec<Event>, SourceError> {
        (**self).poll()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
