//! Cooperative stop signal
//!
//! A [`StopSignal`] is a shared flag checked at the top of every source cycle
//! and every coordinator tick. Triggering it never interrupts in-flight work,
//! so a full stop can lag by up to one cycle period.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cooperative stop flag
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    /// Create a new, untriggered signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop
    pub fn trigger(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    /// Check whether a stop was requested
    pub fn is_triggered(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Trigger this signal on Ctrl+C
    pub fn install_ctrlc_handler(&self) -> Result<(), ctrlc::Error> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            log::info!("Received stop signal, shutting down...");
            signal.trigger();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_signal_not_triggered() {
        assert!(!StopSignal::new().is_triggered());
    }

    #[test]
    fn test_clone_observes_trigger() {
        let signal = StopSignal::new();
        let observer = signal.clone();
        signal.trigger();
        assert!(observer.is_triggered());
    }
}
