//! Event hand-off channel
//!
//! Unbounded FIFO queue between the source worker thread and the coordinator.
//! Pushing never blocks; draining never waits.

use crate::domain::Event;
use crate::error::SourceError;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Create a connected sender/receiver pair
pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

/// Producer side of the channel; cheap to clone
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Enqueue an event
    ///
    /// # Errors
    /// Returns `SourceError::Disconnected` once the receiver has been dropped.
    pub fn push(&self, event: Event) -> Result<(), SourceError> {
        self.tx.send(event).map_err(|_| SourceError::Disconnected)
    }
}

/// Consumer side of the channel
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<Event>,
}

impl EventReceiver {
    /// Remove and return every buffered event in arrival order.
    ///
    /// Returns immediately with an empty vector when nothing is pending.
    pub fn drain_all(&self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}
